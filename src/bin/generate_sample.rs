use std::f64::consts::PI;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

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
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos();
        mean + std_dev * z
    }
}

/// Logger-style CSV: three bookkeeping columns, then time and signal.
fn logger_csv(
    header: &str,
    n: usize,
    dt: f64,
    period: f64,
    noise: f64,
    rng: &mut SimpleRng,
) -> String {
    let mut out = format!("{header}\n");
    for i in 0..n {
        let t = i as f64 * dt;
        let y = (2.0 * PI * t / period).sin() + rng.gauss(0.0, noise);
        writeln!(out, "{i},CH1,V,{t:.6},{y:.6}").expect("writing to String");
    }
    out
}

fn main() {
    let out_dir = std::env::args().nth(1).unwrap_or_else(|| "sample_data".into());
    let out_dir = Path::new(&out_dir);
    fs::create_dir_all(out_dir).expect("Failed to create output directory");

    let mut rng = SimpleRng::new(42);
    let header = "No,Channel,Unit,Time,Value";

    // Clean sinusoids at a few periods.
    for (name, n, dt, period) in [
        ("sine_p5.csv", 100, 1.0, 5.0),
        ("sine_p12_5.csv", 200, 0.5, 12.5),
        ("sine_p4.csv", 400, 0.1, 4.0),
    ] {
        let body = logger_csv(header, n, dt, period, 0.05, &mut rng);
        fs::write(out_dir.join(name), body).expect("Failed to write sample");
    }

    // Shift_JIS header, as exported by Japanese-locale loggers.
    let body = logger_csv("番号,チャンネル,単位,時間,値", 128, 1.0, 16.0, 0.1, &mut rng);
    let (bytes, _, _) = encoding_rs::SHIFT_JIS.encode(&body);
    fs::write(out_dir.join("sjis_p16.csv"), &bytes).expect("Failed to write sample");

    // UTF-8 header that Shift_JIS cannot decode.
    let body = logger_csv("No,Canal,Unité à,Temps,Valeur", 64, 1.0, 8.0, 0.1, &mut rng);
    fs::write(out_dir.join("utf8_p8.csv"), body).expect("Failed to write sample");

    // A spreadsheet export with a dead #DIV/0! column before the data.
    let mut body = String::from("No,Ratio,Channel,Unit,Time,Value\n");
    for i in 0..60 {
        let t = i as f64;
        let y = (2.0 * PI * t / 6.0).sin();
        writeln!(body, "{i},#DIV/0!,CH1,V,{t},{y:.6}").expect("writing to String");
    }
    fs::write(out_dir.join("div0_p6.csv"), body).expect("Failed to write sample");

    // Failure cases.
    fs::write(out_dir.join("one_row.csv"), format!("{header}\n0,CH1,V,0,1.0\n"))
        .expect("Failed to write sample");
    fs::write(out_dir.join("flat.csv"), logger_csv(header, 32, 1.0, f64::INFINITY, 0.0, &mut rng))
        .expect("Failed to write sample");
    fs::write(out_dir.join("notes.txt"), "not a data file\n").expect("Failed to write sample");

    println!("Wrote sample files to {}", out_dir.display());
}
