use palette_kmeans::*;

fn main() {
    let (width, height, k, max_iter) = (64u32, 48u32, 4, 100);

    // Paint a synthetic image: four color bands with a little noise
    let bands = [Rgba::new(20, 30, 120, 255), Rgba::new(200, 40, 40, 255), Rgba::new(240, 240, 230, 255), Rgba::new(10, 10, 10, 255)];
    let pixels = (0..height).flat_map(|y| (0..width).map(move |x| (x, y))).map(|(x, y)| {
        let base = bands[(x * bands.len() as u32 / width) as usize];
        let noise: u8 = rand::random::<u8>() % 6;
        Pixel { position: (x, y), color: Rgba::new(base.red.saturating_add(noise), base.green.saturating_add(noise), base.blue, base.alpha) }
    });
    let map = ColorMap::from_pixels(width, height, pixels);
    let map = map.trim_color_distribution(map.default_pixel_limit(), 8);

    // Cluster the distinct colors, using kmean++ as initialization-method
    let mut kmean = KMeans::new(map.to_dataset::<f64>());
    let result = match kmean.kmeans_lloyd(k, max_iter, KMeans::init_kmeanplusplus, &KMeansConfig::default()) {
        Ok(result) => result,
        Err(err) => {
            eprintln!("Clustering failed: {}", err);
            return;
        }
    };

    println!("{} distinct colors, {:?} after {} iterations, error {:.2}", map.len(), result.outcome, result.iterations, result.sse);
    for layer in map.layers(kmean.data()) {
        println!("Layer {}: {} colors, {} pixels", layer.cluster_no, layer.colors.len(), layer.pixels.len());
    }
    println!("Fused: {} pixels", map.fused_pixels().len());
}
