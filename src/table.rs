//! Delimited text tables: the first row names the attributes, every following row is one record.

use crate::{DataSet, DataSetError, Primitive};
use log::info;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

pub const DEFAULT_DELIMITER: char = ',';

/// Name of the column appended to the output table.
pub const CLUSTER_ID_COLUMN: &str = "ClusterId";

impl<T: Primitive> DataSet<T> {
    /// Read a comma separated table. See [`DataSet::from_reader_with_delimiter`].
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, DataSetError> {
        Self::from_reader_with_delimiter(reader, DEFAULT_DELIMITER)
    }

    /// Read a delimited table.
    ///
    /// Fields are trimmed and blank lines are skipped. Row numbers in errors are 1-based line numbers.
    /// The whole load fails on the first malformed row; there is no partial data set.
    pub fn from_reader_with_delimiter<R: BufRead>(reader: R, delimiter: char) -> Result<Self, DataSetError> {
        let mut lines = reader.lines().enumerate()
            .map(|(idx, line)| line.map(|l| (idx + 1, l)));

        let mut data = loop {
            match lines.next().transpose()? {
                Some((_, line)) if line.trim().is_empty() => continue,
                Some((_, line)) => break Self::new(line.split(delimiter).map(str::trim))?,
                None => return Err(DataSetError::MissingHeader),
            }
        };

        for line in lines {
            let (row, line) = line?;
            if line.trim().is_empty() {
                continue;
            }
            let fields: Vec<&str> = line.split(delimiter).map(str::trim).collect();
            if fields.len() != data.attr_names().len() {
                return Err(DataSetError::SchemaMismatch { row, expected: data.attr_names().len(), found: fields.len() });
            }
            let values = fields.iter().zip(data.attr_names())
                .map(|(field, name)| field.parse::<T>().map_err(|_| DataSetError::InvalidValue {
                    row, attribute: name.clone(), value: field.to_string()
                }))
                .collect::<Result<Vec<T>, _>>()?;
            data.push_row(row, values)?;
        }

        info!("Recorded {} records.", data.len());
        Ok(data)
    }

    pub fn from_csv_file<P: AsRef<Path>>(path: P) -> Result<Self, DataSetError> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Write all records with a trailing [`CLUSTER_ID_COLUMN`], in record order.
    /// Records that were never assigned get an empty cluster field.
    pub fn write_csv<W: Write>(&self, mut writer: W) -> Result<(), DataSetError> {
        let d = DEFAULT_DELIMITER;
        for name in self.attr_names() {
            write!(writer, "{}{}", name, d)?;
        }
        writeln!(writer, "{}", CLUSTER_ID_COLUMN)?;

        for record in self.records() {
            for name in self.attr_names() {
                match record.get(name) {
                    Some(v) => write!(writer, "{}{}", v, d)?,
                    None => write!(writer, "{}", d)?,
                }
            }
            match record.cluster_no() {
                Some(cluster_no) => writeln!(writer, "{}", cluster_no)?,
                None => writeln!(writer)?,
            }
        }
        Ok(())
    }

    pub fn create_csv_output<P: AsRef<Path>>(&self, path: P) -> Result<(), DataSetError> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_csv(&mut writer)?;
        writer.flush()?;
        Ok(())
    }
}
