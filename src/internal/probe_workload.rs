#![allow(clippy::missing_docs_in_private_items)]
#![allow(clippy::arithmetic_side_effects)]
#![allow(clippy::indexing_slicing)]
#![allow(clippy::pedantic)]
#![allow(clippy::unwrap_used)]
#![allow(warnings)]

use plotters::prelude::*;
use probemap::ProbeMap;
use rand::Rng;
use rand::seq::SliceRandom;
use std::time::Instant;

// Bulk workload matching the reference driver: fill half a million keys
// starting from a deliberately tiny table, delete the low range, verify.
const TOTAL_KEYS: usize = 500_000;
const REMOVED_KEYS: usize = 100_000;
const INITIAL_CAPACITY: usize = 17;

// Sampling configuration for the fill-phase measurements.
const SAMPLE_EVERY: usize = 10_000;
const LOOKUPS_PER_SAMPLE: usize = 10_000;

fn workload_key(i: usize) -> String {
    format!("key_{i}")
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut map = ProbeMap::with_capacity(INITIAL_CAPACITY);
    let mut rng = rand::rng();

    // Phase 1: bulk insert, sampling the table as it fills.
    let mut fill_points: Vec<f64> = Vec::new();
    let mut load_factors: Vec<f64> = Vec::new();
    let mut lookup_micros: Vec<f64> = Vec::new();

    let fill_start = Instant::now();
    for i in 0..TOTAL_KEYS {
        map.insert(workload_key(i), i as i64);

        if (i + 1) % SAMPLE_EVERY == 0 {
            fill_points.push((i + 1) as f64);
            load_factors.push(map.load_factor() * 100.0);

            // Time a burst of random lookups over the keys inserted so far.
            let start = Instant::now();
            for _ in 0..LOOKUPS_PER_SAMPLE {
                let probe = rng.random_range(0..=i);
                assert!(map.get(&workload_key(probe)).is_some());
            }
            lookup_micros
                .push(start.elapsed().as_secs_f64() * 1_000_000.0 / LOOKUPS_PER_SAMPLE as f64);
        }
    }
    println!(
        "Inserted {} keys in {:.2?}: capacity {}, load factor {:.1}%",
        map.len(),
        fill_start.elapsed(),
        map.capacity(),
        map.load_factor() * 100.0
    );

    // Phase 2: delete the low range, then verify absence and survivorship.
    let capacity_before_removal = map.capacity();
    for i in 0..REMOVED_KEYS {
        map.remove(&workload_key(i));
    }
    assert_eq!(map.len(), TOTAL_KEYS - REMOVED_KEYS);
    assert_eq!(map.capacity(), capacity_before_removal); // No shrink on delete.

    for i in 0..REMOVED_KEYS {
        assert!(map.get(&workload_key(i)).is_none());
    }
    for i in REMOVED_KEYS..TOTAL_KEYS {
        assert_eq!(map.get(&workload_key(i)), Some(&(i as i64)));
    }
    println!("Removed {} keys, {} remain", REMOVED_KEYS, map.len());

    // Phase 3: shuffled re-verification, so the lookup order shares nothing
    // with the insertion order.
    let mut survivors: Vec<usize> = (REMOVED_KEYS..TOTAL_KEYS).collect();
    survivors.shuffle(&mut rng);
    let verify_start = Instant::now();
    for &i in &survivors {
        assert_eq!(map.get(&workload_key(i)), Some(&(i as i64)));
    }
    println!("Shuffled verification of {} keys in {:.2?}", survivors.len(), verify_start.elapsed());

    // Plot configuration shared by both charts.
    let font_family = "sans-serif";
    let text_size = 16;
    let title_size = 35;
    let line_width = 2;
    let marker_size = 4;
    let max_x = TOTAL_KEYS as f64 * 1.05;

    // Plot 1: load factor across the fill, sawtoothing at every doubling.
    let root = BitMapBackend::new("table_fill.png", (1200, 800)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Load Factor While Filling the Table", (font_family, title_size))
        .margin(15)
        .x_label_area_size(60)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0..max_x, 0.0..105.0_f64)?;

    chart
        .configure_mesh()
        .x_desc("Number of Keys Inserted")
        .y_desc("Load Factor (%)")
        .axis_desc_style((font_family, text_size))
        .draw()?;

    // Reference line at the growth threshold.
    let threshold_style = ShapeStyle::from(&RED.mix(0.3)).stroke_width(1);
    chart
        .draw_series(LineSeries::new(vec![(0.0, 80.0), (max_x, 80.0)], threshold_style))?
        .label("Growth Threshold (80%)")
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], threshold_style));

    let fill_style = ShapeStyle::from(&RGBColor(50, 90, 220)).stroke_width(line_width);
    chart
        .draw_series(LineSeries::new(
            fill_points.iter().zip(load_factors.iter()).map(|(&x, &y)| (x, y)),
            fill_style,
        ))?
        .label("Load Factor")
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], fill_style));

    chart.draw_series(
        fill_points
            .iter()
            .zip(load_factors.iter())
            .map(|(&x, &y)| Circle::new((x, y), marker_size, RGBColor(50, 90, 220).filled())),
    )?;

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .position(SeriesLabelPosition::LowerRight)
        .draw()?;

    // Plot 2: average lookup cost as the table fills.
    let root = BitMapBackend::new("lookup_cost.png", (1200, 800)).into_drawing_area();
    root.fill(&WHITE)?;

    let max_lookup =
        lookup_micros.iter().fold(0.0, |max, &x| if x > max { x } else { max }) * 1.1;

    let mut chart = ChartBuilder::on(&root)
        .caption("Average Lookup Cost While Filling the Table", (font_family, title_size))
        .margin(15)
        .x_label_area_size(60)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0..max_x, 0.0..max_lookup)?;

    chart
        .configure_mesh()
        .x_desc("Number of Keys Inserted")
        .y_desc("Average Lookup Time (µs)")
        .axis_desc_style((font_family, text_size))
        .draw()?;

    let lookup_style = ShapeStyle::from(&RGBColor(220, 50, 50)).stroke_width(line_width);
    chart
        .draw_series(LineSeries::new(
            fill_points.iter().zip(lookup_micros.iter()).map(|(&x, &y)| (x, y)),
            lookup_style,
        ))?
        .label("Random Lookup")
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], lookup_style));

    chart.draw_series(
        fill_points
            .iter()
            .zip(lookup_micros.iter())
            .map(|(&x, &y)| Circle::new((x, y), marker_size, RGBColor(220, 50, 50).filled())),
    )?;

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .position(SeriesLabelPosition::UpperLeft)
        .draw()?;

    println!("Generated plot images: table_fill.png, lookup_cost.png");
    println!("OK");

    Ok(())
}
