//! Text rendering of prediction results.
//!
//! Pure string-producing functions so the output can be tested without a
//! terminal. Feature bars use the same display scales as the original UI:
//! 5 keys/sec, 2000 ms, 50 %.

use crate::predictor::Prediction;

/// Display scale maximum for typing speed (keys per second).
const SPEED_SCALE_MAX: f64 = 5.0;
/// Display scale maximum for average pause (milliseconds).
const PAUSE_SCALE_MAX: f64 = 2000.0;
/// Display scale maximum for error rate (percent).
const ERROR_SCALE_MAX: f64 = 50.0;

/// Width of a feature bar in characters.
const BAR_WIDTH: usize = 30;

/// Render a value as a fixed-width bar, clamped to `max`.
pub fn feature_bar(value: f64, max: f64) -> String {
    let fraction = (value / max).clamp(0.0, 1.0);
    let filled = (fraction * BAR_WIDTH as f64).round() as usize;
    let mut bar = String::with_capacity(BAR_WIDTH + 2);
    bar.push('[');
    for i in 0..BAR_WIDTH {
        bar.push(if i < filled { '#' } else { '.' });
    }
    bar.push(']');
    bar
}

/// Render a full prediction report for display.
pub fn render_report(prediction: &Prediction) -> String {
    let features = &prediction.features;

    let mut out = String::new();
    out.push_str("Stress Analysis Result\n");
    out.push_str("======================\n\n");
    out.push_str(&format!("  Stress level: {}\n", prediction.stress_level));
    out.push_str(&format!("  Confidence:   {:.1}%\n\n", prediction.confidence));
    out.push_str(&format!(
        "  Typing speed  {} {:.2} keys/sec\n",
        feature_bar(features.typing_speed, SPEED_SCALE_MAX),
        features.typing_speed
    ));
    out.push_str(&format!(
        "  Avg pause     {} {:.2} ms\n",
        feature_bar(features.avg_pause, PAUSE_SCALE_MAX),
        features.avg_pause
    ));
    out.push_str(&format!(
        "  Error rate    {} {:.2}%\n",
        feature_bar(features.error_rate, ERROR_SCALE_MAX),
        features.error_rate
    ));

    if !prediction.tips.is_empty() {
        out.push_str("\nTips:\n");
        for tip in &prediction.tips {
            out.push_str(&format!("  - {tip}\n"));
        }
    }

    out
}
