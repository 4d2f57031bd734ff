use chrono::{Days, NaiveDate};

// Standalone generator: writes the same deterministic sample the app
// synthesizes when no source file is present, so the file-backed and
// fallback paths can be compared directly.

const PRODUCTS: [&str; 5] = ["Smartphones", "Tablets", "Laptops", "Headphones", "Accessories"];
const REGIONS: [&str; 5] = ["North", "South", "East", "West", "Central"];
const SEED: u64 = 42;
const DAYS: u32 = 100;

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
}

fn main() -> anyhow::Result<()> {
    let mut rng = SimpleRng::new(SEED);
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid fixed date");

    let output_path = "Dataset.csv";
    let mut writer = csv::Writer::from_path(output_path)?;
    writer.write_record(["date", "product", "region", "revenue"])?;

    let mut rows = 0u32;
    for day in 0..DAYS {
        let date = start + Days::new(day as u64);
        let per_day = 1 + (rng.next_u64() % 3) as usize;
        for _ in 0..per_day {
            let product = PRODUCTS[(rng.next_u64() % 5) as usize];
            let region = REGIONS[(rng.next_u64() % 5) as usize];
            let revenue = 1000 + rng.next_u64() % 49_000;
            writer.write_record([
                date.to_string().as_str(),
                product,
                region,
                revenue.to_string().as_str(),
            ])?;
            rows += 1;
        }
    }
    writer.flush()?;

    println!("Wrote {rows} records over {DAYS} days to {output_path}");
    Ok(())
}
