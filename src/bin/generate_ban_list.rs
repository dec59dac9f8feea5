use banned_ip_map::coordinates::COUNTRY_TABLE;
use clap::Parser;
use rand::{seq::SliceRandom, Rng};
use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::PathBuf,
};

/// Writes a random banned IP list in the dashboard's CSV format.
#[derive(Parser)]
struct Args {
    /// Number of data rows
    #[arg(long, default_value_t = 200)]
    rows: usize,

    /// Output file; stdout when absent
    #[arg(long)]
    output: Option<PathBuf>,
}

const UNMAPPED: &[(&str, &str)] = &[("NL", "Netherlands"), ("UA", "Ukraine"), ("TR", "Turkey")];

fn write_rows<W: Write>(mut out: W, rows: usize, rng: &mut impl Rng) -> io::Result<()> {
    writeln!(out, "ip,countryCode,country")?;
    for _ in 0..rows {
        let (code, name) = if rng.gen_bool(0.1) {
            *UNMAPPED.choose(rng).unwrap_or(&UNMAPPED[0])
        } else {
            let entry = &COUNTRY_TABLE[rng.gen_range(0, COUNTRY_TABLE.len())];
            (entry.code, entry.names[0])
        };
        writeln!(
            out,
            "{}.{}.{}.{},{code},{name}",
            rng.gen_range(1, 224),
            rng.gen::<u8>(),
            rng.gen::<u8>(),
            rng.gen_range(1, 255)
        )?;
    }
    out.flush()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let mut rng = rand::thread_rng();
    match &args.output {
        Some(path) => write_rows(BufWriter::new(File::create(path)?), args.rows, &mut rng)?,
        None => write_rows(io::stdout().lock(), args.rows, &mut rng)?,
    }
    Ok(())
}
