//! Simulation report generation.

use serde::Serialize;
use std::collections::BTreeMap;

use super::runner::RunStats;

/// Width of a wave bucket in the distribution table.
const WAVE_BUCKET: u32 = 10;

/// Aggregated results from multiple simulation runs.
#[derive(Debug, Clone, Serialize)]
pub struct SimReport {
    pub num_runs: u32,
    pub runs_died: u32,
    pub runs_reached_max: u32,
    pub runs_stalled: u32,

    pub avg_final_wave: f64,
    pub avg_final_level: f64,
    pub avg_total_kills: f64,
    pub avg_best_streak: f64,
    pub max_wave: u32,

    /// Share of runs whose final wave unlocks a rebirth.
    pub rebirth_rate: f64,

    /// Bucket start wave -> runs that ended in it.
    pub wave_distribution: BTreeMap<u32, u32>,

    #[serde(skip)]
    pub run_stats: Vec<RunStats>,
}

fn mean(runs: &[RunStats], f: impl Fn(&RunStats) -> f64) -> f64 {
    if runs.is_empty() {
        return 0.0;
    }
    runs.iter().map(f).sum::<f64>() / runs.len() as f64
}

fn count(runs: &[RunStats], pred: impl Fn(&RunStats) -> bool) -> u32 {
    runs.iter().filter(|r| pred(r)).count() as u32
}

impl SimReport {
    pub fn from_runs(runs: Vec<RunStats>, max_waves: u32) -> Self {
        let num_runs = runs.len() as u32;
        let mut wave_distribution = BTreeMap::new();
        for run in &runs {
            let bucket = run.final_wave / WAVE_BUCKET * WAVE_BUCKET;
            *wave_distribution.entry(bucket).or_insert(0) += 1;
        }

        let rebirth_runs = count(&runs, |r| r.rebirth_unlocked.is_some());

        Self {
            num_runs,
            runs_died: count(&runs, |r| r.died),
            runs_reached_max: count(&runs, |r| r.waves_cleared >= max_waves),
            runs_stalled: count(&runs, |r| r.stalled),
            avg_final_wave: mean(&runs, |r| r.final_wave as f64),
            avg_final_level: mean(&runs, |r| r.final_level as f64),
            avg_total_kills: mean(&runs, |r| r.total_kills as f64),
            avg_best_streak: mean(&runs, |r| r.best_streak as f64),
            max_wave: runs.iter().map(|r| r.final_wave).max().unwrap_or(0),
            rebirth_rate: rebirth_runs as f64 / num_runs.max(1) as f64,
            wave_distribution,
            run_stats: runs,
        }
    }

    /// Generate a text report.
    pub fn to_text(&self) -> String {
        let mut report = String::new();

        report.push_str("═══════════════════════════════════════════════════════════════\n");
        report.push_str("                  VIBE ARENA SIMULATION REPORT\n");
        report.push_str("═══════════════════════════════════════════════════════════════\n\n");

        report.push_str(&format!(
            "Runs: {} total, {} died, {} reached max wave, {} stalled\n\n",
            self.num_runs, self.runs_died, self.runs_reached_max, self.runs_stalled
        ));

        report.push_str("── PROGRESSION ──────────────────────────────────────────────────\n");
        report.push_str(&format!("  Avg Final Wave:   {:.1}\n", self.avg_final_wave));
        report.push_str(&format!("  Best Wave:        {}\n", self.max_wave));
        report.push_str(&format!("  Avg Final Level:  {:.1}\n", self.avg_final_level));
        report.push_str(&format!("  Avg Total Kills:  {:.0}\n", self.avg_total_kills));
        report.push_str(&format!("  Avg Best Streak:  {:.1}\n", self.avg_best_streak));
        report.push_str(&format!(
            "  Rebirth Unlocked: {:.1}%\n\n",
            self.rebirth_rate * 100.0
        ));

        report.push_str("── FINAL WAVE DISTRIBUTION ──────────────────────────────────────\n");
        for (bucket, runs) in &self.wave_distribution {
            let pct = *runs as f64 / self.num_runs.max(1) as f64 * 100.0;
            let bar = "█".repeat((pct / 5.0) as usize);
            report.push_str(&format!(
                "  Wave {:3}-{:<3} {:>5.1}% {}\n",
                bucket,
                bucket + WAVE_BUCKET - 1,
                pct,
                bar
            ));
        }
        report.push('\n');

        report.push_str("── BALANCE ASSESSMENT ───────────────────────────────────────────\n");
        if self.runs_stalled > 0 {
            report.push_str("  ⚠️  Some runs stalled - enemy health outpacing damage?\n");
        }
        if self.avg_final_wave < 10.0 {
            report.push_str("  ⚠️  Most runs end before wave 10 - early game too hard?\n");
        }
        if self.num_runs > 0 && self.runs_reached_max == self.num_runs {
            report.push_str("  ⚠️  Every run reached the wave cap - too easy?\n");
        }

        report.push_str("\n═══════════════════════════════════════════════════════════════\n");
        report
    }

    /// Generate a JSON report for further analysis.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}
