//! Health recovery milestones keyed on smoke-free days.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthMilestone {
    /// Fractional days: 20 minutes is 0.014.
    pub days: f64,
    pub title: &'static str,
    pub description: &'static str,
}

pub const HEALTH_MILESTONES: [HealthMilestone; 9] = [
    HealthMilestone { days: 0.014, title: "20 Minutes", description: "Heart rate and blood pressure begin to drop" },
    HealthMilestone { days: 0.5, title: "12 Hours", description: "Carbon monoxide level in your blood drops to normal" },
    HealthMilestone { days: 3.0, title: "3 Days", description: "Nicotine is completely out of your body" },
    HealthMilestone { days: 14.0, title: "2 Weeks", description: "Circulation improves and lung function increases" },
    HealthMilestone { days: 30.0, title: "1 Month", description: "Coughing and shortness of breath decrease" },
    HealthMilestone { days: 90.0, title: "3 Months", description: "Risk of heart attack begins to drop" },
    HealthMilestone { days: 365.0, title: "1 Year", description: "Risk of heart disease is half that of a smoker" },
    HealthMilestone { days: 1825.0, title: "5 Years", description: "Risk of stroke same as non-smoker" },
    HealthMilestone { days: 3650.0, title: "10 Years", description: "Risk of lung cancer is half that of a smoker" },
];

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MilestoneStatus {
    pub milestone: HealthMilestone,
    pub achieved: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthProgress {
    pub milestones: Vec<MilestoneStatus>,
    /// First milestone not yet reached; the last one once all are reached.
    pub next: HealthMilestone,
    /// Whole days until `next`, never negative.
    pub days_left: u32,
    /// 0..=100 progress from the previous milestone to `next`.
    pub progress_pct: f64,
}

pub fn health_progress(total_smoke_free: u32) -> HealthProgress {
    let done = total_smoke_free as f64;
    let milestones = HEALTH_MILESTONES
        .iter()
        .map(|m| MilestoneStatus {
            milestone: *m,
            achieved: done >= m.days,
        })
        .collect();

    let last = HEALTH_MILESTONES[HEALTH_MILESTONES.len() - 1];
    let next_index = HEALTH_MILESTONES.iter().position(|m| m.days > done);
    let (next, progress_pct) = match next_index {
        // Nothing before the first milestone to measure from.
        Some(0) => (HEALTH_MILESTONES[0], 0.0),
        Some(i) => {
            let prev = HEALTH_MILESTONES[i - 1];
            let next = HEALTH_MILESTONES[i];
            let pct = (done - prev.days) / (next.days - prev.days) * 100.0;
            (next, pct.clamp(0.0, 100.0))
        }
        None => (last, 100.0),
    };

    HealthProgress {
        milestones,
        next,
        days_left: (next.days - done).ceil().max(0.0) as u32,
        progress_pct,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_days_points_at_first_milestone() {
        let progress = health_progress(0);
        assert_eq!(progress.next.title, "20 Minutes");
        assert_eq!(progress.progress_pct, 0.0);
        assert!(progress.milestones.iter().all(|m| !m.achieved));
    }

    #[test]
    fn mid_way_between_milestones() {
        // 3 days reached, 14 days next: 5 of 11.
        let progress = health_progress(8);
        assert_eq!(progress.next.title, "2 Weeks");
        assert_eq!(progress.days_left, 6);
        assert!((progress.progress_pct - 5.0 / 11.0 * 100.0).abs() < 1e-9);
        assert_eq!(progress.milestones.iter().filter(|m| m.achieved).count(), 3);
    }

    #[test]
    fn all_milestones_reached() {
        let progress = health_progress(4000);
        assert_eq!(progress.next.title, "10 Years");
        assert_eq!(progress.days_left, 0);
        assert_eq!(progress.progress_pct, 100.0);
    }
}
