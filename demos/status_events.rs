use palette_kmeans::*;

fn main() {
    let (sample_cnt, k, max_iter) = (20000, 4, 2500);

    // Generate some random data
    let points: Vec<Vec<f64>> = (0..sample_cnt).map(|_| vec![rand::random(), rand::random(), rand::random()]).collect();
    let data = match DataSet::from_points(["a", "b", "c"], points) {
        Ok(data) => data,
        Err(err) => {
            eprintln!("Invalid input: {}", err);
            return;
        }
    };

    let conf = KMeansConfig::<f64>::build()
        .init_done(&|_| println!("Initialization completed."))
        .iteration_done(&|s, nr, new_sse|
            println!("Iteration {} - Error: {:.2} -> {:.2} | Improvement: {:.2}",
                nr, s.sse, new_sse, s.sse - new_sse))
        .abort_strategy(AbortStrategy::NoImprovementForXIterations {
            // Abort after there has not been an improvement for 5 iterations
            x: 5,
            // Only count as improvement if > 0.0005 difference
            threshold: 0.0005f64,
            // Do not directly abort after a negative improvement
            abort_on_negative: false
        })
        .build();

    // Calculate kmeans, using kmean++ as initialization-method
    let mut kmean = KMeans::new(data);
    match kmean.kmeans_lloyd(k, max_iter, KMeans::init_kmeanplusplus, &conf) {
        Ok(result) => {
            println!("Centroids: {:?}", result.centroids);
            println!("Cluster sizes: {:?}", result.centroid_frequency);
            println!("Error: {}", result.sse);
        }
        Err(err) => eprintln!("Clustering failed: {}", err),
    }
}
