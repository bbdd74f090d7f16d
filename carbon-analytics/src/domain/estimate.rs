use crate::analytics::metrics::{emission, savings};
use crate::domain::Decision;

/// Emission of one task, in gCO2, run normally and run green.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EmissionEstimate {
    pub normal: f64,
    pub green: f64,
    pub saved: f64,
}

impl EmissionEstimate {
    /// Green execution always applies: `green = normal * green_factor`.
    pub fn new(avg_intensity: f64, energy_per_task_kwh: f64, green_factor: f64) -> Self {
        let normal = emission(avg_intensity, energy_per_task_kwh);
        let green = normal * green_factor;
        Self {
            normal,
            green,
            saved: savings(normal, green),
        }
    }

    /// Green execution applies only when the scheduler decided to run now;
    /// a deferred task is accounted at its normal emission.
    pub fn for_decision(
        avg_intensity: f64,
        energy_per_task_kwh: f64,
        green_factor: f64,
        decision: Decision,
    ) -> Self {
        match decision {
            Decision::ExecuteNow => Self::new(avg_intensity, energy_per_task_kwh, green_factor),
            Decision::Defer => {
                let normal = emission(avg_intensity, energy_per_task_kwh);
                Self {
                    normal,
                    green: normal,
                    saved: 0.0,
                }
            }
        }
    }

    /// Saved share of the normal emission, in percent. Zero when nothing is emitted.
    pub fn reduction_percentage(&self) -> f64 {
        if self.normal == 0.0 {
            0.0
        } else {
            self.saved / self.normal * 100.0
        }
    }
}

/// Savings projected over a national workload.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NationalSavings {
    pub tasks_per_day: u64,
    pub daily_g: f64,
    pub daily_kg: f64,
    pub annual_kg: f64,
    pub annual_tonnes: f64,
}

impl NationalSavings {
    pub fn project(saved_g_per_task: f64, tasks_per_day: u64) -> Self {
        let daily_g = saved_g_per_task * tasks_per_day as f64;
        let annual_kg = daily_g * 365.0 / 1000.0;
        Self {
            tasks_per_day,
            daily_g,
            daily_kg: daily_g / 1000.0,
            annual_kg,
            annual_tonnes: annual_kg / 1000.0,
        }
    }
}

/// Outcome of delaying a task by a number of hours.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DelaySimulation {
    pub delay_hours: u8,
    pub simulated: f64,
    pub extra_saved: f64,
}
