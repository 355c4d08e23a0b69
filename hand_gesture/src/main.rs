//! landmark_probe — print what the classifier sees, one line per frame.
//!
//! Pipe detector JSON lines in on stdin:
//!
//! ```text
//! python3 detect.py | landmark_probe --width 1920 --height 1080
//! ```

use std::io::{self, BufRead};

use hand_gesture::{
    classify, hand_orientation, parse_detection_line, pinch_position, CursorEstimator,
    GestureThresholds,
};

/// Info by default; `RUST_LOG` can raise or lower it.
fn log_builder() -> env_logger::Builder {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(log::LevelFilter::Info).parse_default_env();
    builder
}

fn main() {
    log_builder().init();

    let (width, height) = frame_size_from_args();
    let thresholds = GestureThresholds::default();
    let mut cursor = CursorEstimator::default();

    let stdin = io::stdin();
    for (n, line) in stdin.lock().lines().enumerate() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                log::error!("stdin: {}", e);
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let det = match parse_detection_line(&line) {
            Ok(d) => d,
            Err(e) => {
                log::warn!("frame {}: {}", n, e);
                continue;
            }
        };
        let (w, h) = det.frame_size((width, height));
        let (w, h) = (w as f32, h as f32);

        let Some(hand) = det.hand.as_ref() else {
            cursor.estimate(None, w, h);
            println!("{:>6}  no hand", n);
            continue;
        };

        let pos = cursor.estimate(Some(hand), w, h);
        let pinch = pinch_position(hand, w, h, &thresholds);
        println!(
            "{:>6}  {:<6}  {:<7}  cursor={}  pinch={}",
            n,
            classify(hand, &thresholds).as_str(),
            format!("{:?}", hand_orientation(hand)).to_lowercase(),
            fmt_point(pos),
            fmt_point(pinch),
        );
    }
}

fn fmt_point(p: Option<hand_gesture::Point>) -> String {
    match p {
        Some(p) => format!("({:.0},{:.0})", p.x, p.y),
        None    => "-".to_string(),
    }
}

fn frame_size_from_args() -> (u32, u32) {
    let args: Vec<String> = std::env::args().collect();
    let value = |flag: &str, default: u32| {
        args.iter()
            .position(|a| a == flag)
            .and_then(|i| args.get(i + 1))
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    };
    (value("--width", 1920), value("--height", 1080))
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::LevelFilter;

    #[test]
    fn rust_log_overrides_the_default_level() {
        std::env::remove_var("RUST_LOG");
        assert_eq!(log_builder().build().filter(), LevelFilter::Info);
        std::env::set_var("RUST_LOG", "debug");
        assert_eq!(log_builder().build().filter(), LevelFilter::Debug);
        std::env::remove_var("RUST_LOG");
    }
}
