extern crate criterion;

use criterion::{criterion_group, criterion_main, Criterion};
use std::io::Cursor;
use std::time::Duration;

use ionex::prelude::Ionex;

const XSIZE: usize = 73; // -180..180 step 5
const YSIZE: usize = 71; // 87.5..-87.5 step -2.5
const MAP_COUNT: usize = 24;

fn header_line(content: &str, label: &str) -> String {
    format!("{:<60}{}\n", content, label)
}

fn value_line(values: &[i64]) -> String {
    let mut line = String::with_capacity(values.len() * 5);
    for value in values {
        line.push_str(&format!("{:5}", value));
    }
    line.push('\n');
    line
}

/// Builds a synthetic worldwide IONEX resource with `MAP_COUNT` hourly maps,
/// each holding a uniform TEC value equal to its map index.
fn synthetic_ionex() -> String {
    let mut text = String::new();

    text.push_str(&header_line("1.0                 I", "IONEX VERSION / TYPE"));
    text.push_str(&header_line(
        "  2022     1     2     0     0     0",
        "EPOCH OF FIRST MAP",
    ));
    text.push_str(&header_line(
        "  2022     1     3     0     0     0",
        "EPOCH OF LAST MAP",
    ));
    text.push_str(&header_line("3600", "INTERVAL"));
    text.push_str(&header_line(&MAP_COUNT.to_string(), "# OF MAPS IN FILE"));
    text.push_str(&header_line("2", "MAP DIMENSION"));
    text.push_str(&header_line("-1", "EXPONENT"));
    text.push_str(&header_line("    87.5 -87.5  -2.5", "LAT1 / LAT2 / DLAT"));
    text.push_str(&header_line("  -180.0 180.0   5.0", "LON1 / LON2 / DLON"));
    text.push_str(&header_line("   350.0 350.0   0.0", "HGT1 / HGT2 / DHGT"));
    text.push_str(&header_line("", "END OF HEADER"));

    for m in 0..MAP_COUNT {
        let hour = m % 24;
        text.push_str(&header_line(&(m + 1).to_string(), "START OF TEC MAP"));
        text.push_str(&header_line(
            &format!("  2022     1     2  {:>4}     0     0", hour),
            "EPOCH OF CURRENT MAP",
        ));

        let mut lat = 87.5;
        for _ in 0..YSIZE {
            text.push_str(&header_line(
                &format!("{:8.1}-180.0 180.0   5.0 350.0", lat),
                "LAT/LON1/LON2/DLON/H",
            ));

            let row = vec![m as i64; XSIZE];
            for chunk in row.chunks(16) {
                text.push_str(&value_line(chunk));
            }

            lat -= 2.5;
        }

        text.push_str(&header_line(&(m + 1).to_string(), "END OF TEC MAP"));
    }

    text
}

fn benchmark(c: &mut Criterion) {
    let text = synthetic_ionex();

    let mut parsing_grp = c.benchmark_group("parsing");
    parsing_grp.measurement_time(Duration::from_secs(10));

    parsing_grp.bench_function("header", |b| {
        b.iter(|| {
            let _ = Ionex::new(Cursor::new(text.as_bytes().to_vec())).unwrap();
        })
    });

    parsing_grp.bench_function("get_tec_at/worldwide_grid_4_points", |b| {
        let mut ionex = Ionex::new(Cursor::new(text.as_bytes().to_vec())).unwrap();
        let points = [(-90.0, 45.0), (0.0, 0.0), (90.0, -45.0), (179.0, -87.0)];

        b.iter(|| {
            let _ = ionex.get_tec_at(&points).unwrap();
        })
    });

    parsing_grp.finish();
}

criterion_group!(benches, benchmark);
criterion_main!(benches);
