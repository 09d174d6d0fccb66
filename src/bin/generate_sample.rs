//! Writes a deterministic iris-like table as both CSV and Parquet.
//!
//! usage: generate_sample [OUT_STEM]   (default: sample_iris)

use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

const COLUMNS: [&str; 5] = [
    "sepal length",
    "sepal width",
    "petal length",
    "petal width",
    "species",
];

/// Per-species (mean, std dev) for sepal length, sepal width, petal length, petal width.
const SPECIES: [(&str, [(f64, f64); 4]); 3] = [
    ("setosa", [(5.01, 0.35), (3.43, 0.38), (1.46, 0.17), (0.25, 0.11)]),
    ("versicolor", [(5.94, 0.52), (2.77, 0.31), (4.26, 0.47), (1.33, 0.20)]),
    ("virginica", [(6.59, 0.64), (2.97, 0.32), (5.55, 0.55), (2.03, 0.27)]),
];

const PER_SPECIES: usize = 50;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// One decimal, never below 0.1 (measurements are lengths).
fn measurement(rng: &mut SimpleRng, mean: f64, sd: f64) -> f64 {
    (rng.gauss(mean, sd).max(0.1) * 10.0).round() / 10.0
}

fn main() -> Result<()> {
    let stem = std::env::args().nth(1).unwrap_or_else(|| "sample_iris".to_string());
    let mut rng = SimpleRng::new(42);

    let mut measures: [Vec<f64>; 4] = Default::default();
    let mut species: Vec<&str> = Vec::new();

    for (name, params) in &SPECIES {
        for _ in 0..PER_SPECIES {
            for (col, &(mean, sd)) in params.iter().enumerate() {
                measures[col].push(measurement(&mut rng, mean, sd));
            }
            species.push(*name);
        }
    }

    // ---- CSV ----
    let csv_path = format!("{stem}.csv");
    let mut writer = csv::Writer::from_path(&csv_path)
        .with_context(|| format!("creating {csv_path}"))?;
    writer.write_record(COLUMNS)?;
    for row in 0..species.len() {
        let mut record: Vec<String> = measures.iter().map(|m| format!("{:.1}", m[row])).collect();
        record.push(species[row].to_string());
        writer.write_record(&record)?;
    }
    writer.flush()?;

    // ---- Parquet ----
    let mut fields: Vec<Field> = COLUMNS[..4]
        .iter()
        .map(|name| Field::new(*name, DataType::Float64, false))
        .collect();
    fields.push(Field::new(COLUMNS[4], DataType::Utf8, false));
    let schema = Arc::new(Schema::new(fields));

    let mut arrays: Vec<Arc<dyn arrow::array::Array>> = measures
        .iter()
        .map(|m| Arc::new(Float64Array::from(m.clone())) as Arc<dyn arrow::array::Array>)
        .collect();
    arrays.push(Arc::new(StringArray::from(species.clone())));

    let batch = RecordBatch::try_new(schema.clone(), arrays).context("building record batch")?;

    let parquet_path = format!("{stem}.parquet");
    let file = std::fs::File::create(&parquet_path)
        .with_context(|| format!("creating {parquet_path}"))?;
    let mut pq = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    pq.write(&batch)?;
    pq.close()?;

    println!(
        "Wrote {} rows ({} species) to {csv_path} and {parquet_path}",
        species.len(),
        SPECIES.len()
    );
    Ok(())
}
