use chrono::{Duration, NaiveDate};

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

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }
}

const HEADER: [&str; 5] = ["Date", "Region", "Product", "Sales", "Quantity"];

fn main() {
    let mut rng = SimpleRng::new(42);

    let regions = ["East", "West", "North", "South"];
    let products = ["Widget", "Gadget", "Gizmo", "Doohickey"];
    let unit_price = |product: &str| match product {
        "Widget" => 19.99,
        "Gadget" => 34.50,
        "Gizmo" => 12.25,
        _ => 7.80,
    };

    let start = NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid start date");
    let output_path = "sales_data.csv";
    let mut writer = csv::Writer::from_path(output_path).expect("Failed to create output file");
    writer.write_record(HEADER).expect("Failed to write header");

    let mut rows = 0;
    for day in 0..90 {
        let date = start + Duration::days(day);
        let transactions = 2 + rng.next_u64() % 4;
        for _ in 0..transactions {
            let region = rng.pick(&regions);
            let product = rng.pick(&products);
            let quantity = 1 + rng.next_u64() % 12;
            let discount = 0.85 + rng.next_f64() * 0.15;
            let sales = (unit_price(product) * quantity as f64 * discount * 100.0).round() / 100.0;

            writer
                .write_record([
                    date.format("%Y-%m-%d").to_string(),
                    region.to_string(),
                    product.to_string(),
                    format!("{sales:.2}"),
                    quantity.to_string(),
                ])
                .expect("Failed to write row");
            rows += 1;
        }

        // Real exports are messy: a pasted-in header and a few unusable rows.
        if day == 45 {
            writer.write_record(HEADER).expect("Failed to write header");
        }
        if day % 30 == 17 {
            writer
                .write_record([date.format("%Y-%m-%d").to_string().as_str(), "East", "Widget", "n/a", "3"])
                .expect("Failed to write row");
            writer
                .write_record(["unknown", "West", "Gadget", "10.00", "1"])
                .expect("Failed to write row");
        }
    }
    writer.flush().expect("Failed to flush output");

    println!("Wrote {rows} sales records to {output_path}");
}
