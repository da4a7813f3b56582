use std::sync::Arc;

use arrow::array::{ArrayRef, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

const HEADERS: [&str; 8] = [
    "Material Code",
    "Material Description",
    "Plant",
    "Storage Location",
    "Qty",
    "Unit",
    "Company Code",
    "Batch",
];

/// Minimal deterministic PRNG (splitmix64)
struct SimpleRng(u64);

impl SimpleRng {
    fn next_u64(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }
}

fn main() {
    let mut rng = SimpleRng(42);

    let materials = [
        ("100-100", "Casing"),
        ("100-200", "Hexagon head screw M10"),
        ("100-300", "Hollow shaft"),
        ("100-400", "Electronic"),
        ("200-110", "Pump PRECISION 100"),
        ("300-120", "Fly wheel"),
    ];
    let plants = ["1000", "1100", "1200"];
    let storage = ["0001", "0002", "0088", ""];
    let units = ["PC", "KG"];

    // One row per generated line, columns in HEADERS order.
    let mut rows: Vec<[String; 8]> = Vec::new();
    for batch_no in 0..240u64 {
        let (code, description) = materials[(rng.next_u64() % materials.len() as u64) as usize];
        rows.push([
            code.to_string(),
            description.to_string(),
            rng.pick(&plants).to_string(),
            rng.pick(&storage).to_string(),
            (1 + rng.next_u64() % 500).to_string(),
            rng.pick(&units).to_string(),
            "1000".to_string(),
            format!("B{batch_no:06}"),
        ]);
    }

    // Parquet: one nullable Utf8 column per header, empty strings as nulls.
    let schema = Arc::new(Schema::new(
        HEADERS
            .iter()
            .map(|h| Field::new(*h, DataType::Utf8, true))
            .collect::<Vec<_>>(),
    ));
    let columns: Vec<ArrayRef> = (0..HEADERS.len())
        .map(|c| {
            let values: StringArray = rows
                .iter()
                .map(|r| Some(r[c].as_str()).filter(|v| !v.is_empty()))
                .collect();
            Arc::new(values) as ArrayRef
        })
        .collect();
    let batch = RecordBatch::try_new(schema.clone(), columns).expect("Failed to create RecordBatch");

    let parquet_path = "sample_sap.parquet";
    let file = std::fs::File::create(parquet_path).expect("Failed to create output file");
    let mut writer = ArrowWriter::try_new(file, schema, None).expect("Failed to create writer");
    writer.write(&batch).expect("Failed to write batch");
    writer.close().expect("Failed to close writer");

    // CSV: same rows.
    let csv_path = "sample_sap.csv";
    let mut csv_writer = csv::Writer::from_path(csv_path).expect("Failed to create CSV file");
    csv_writer.write_record(HEADERS).expect("Failed to write header");
    for row in &rows {
        csv_writer.write_record(row).expect("Failed to write row");
    }
    csv_writer.flush().expect("Failed to flush CSV");

    println!("Wrote {} rows to {parquet_path} and {csv_path}", rows.len());
}
