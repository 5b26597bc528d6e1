//! Print the damage curves as CSV for plotting: loss and % productivity change per exertion
//! class over a WBGT range.
//! Usage: cargo run --bin damage_table -- [min_wbgt] [max_wbgt] [step]
//! Example: cargo run --bin damage_table -- 25 45 1 > curves.csv

use productivity_loss::damage::{
    labour_productivity_damage, productivity_change_percent, ExertionClass,
};

const DEFAULT_MIN: f64 = 20.0;
const DEFAULT_MAX: f64 = 45.0;
const DEFAULT_STEP: f64 = 0.5;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let parse = |i: usize, default: f64| -> Result<f64, String> {
        match args.get(i) {
            Some(raw) => raw
                .parse::<f64>()
                .map_err(|_| format!("invalid number '{raw}'. Usage: damage_table [min] [max] [step]")),
            None => Ok(default),
        }
    };
    let min = parse(0, DEFAULT_MIN)?;
    let max = parse(1, DEFAULT_MAX)?;
    let step = parse(2, DEFAULT_STEP)?;
    if !(step > 0.0) || max < min {
        return Err("need step > 0 and max >= min".into());
    }

    let mut writer = csv::Writer::from_writer(std::io::stdout());
    let mut header = vec!["wbgt".to_string()];
    for class in ExertionClass::ALL {
        header.push(format!("loss_{class}"));
        header.push(format!("change_pct_{class}"));
    }
    writer.write_record(&header)?;

    let steps = ((max - min) / step).floor() as usize;
    for i in 0..=steps {
        // multiply rather than accumulate so the grid does not drift
        let wbgt = min + step * i as f64;
        let mut row = vec![format!("{wbgt:.2}")];
        for class in ExertionClass::ALL {
            let loss = labour_productivity_damage(wbgt, class.params());
            row.push(format!("{loss:.6}"));
            row.push(format!("{:.3}", productivity_change_percent(loss)));
        }
        writer.write_record(&row)?;
    }
    writer.flush()?;
    Ok(())
}
