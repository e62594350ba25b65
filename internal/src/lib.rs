// © 2023-2024 ETH Zurich
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// any later version.
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.
// You should have received a copy of the GNU General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.


use std::time as stdtime;

use anyhow::Context;
use model::json_serialisation::load_ride_assignment_instance_from_json;
use model::travel_time::{HaversineEstimator, MemoizedEstimator};
use solution::json_serialisation::schedule_to_json;
use solver::{AssignmentEngine, SolveReport};
use tracing::info;

pub fn run(input_data: serde_json::Value) -> anyhow::Result<serde_json::Value> {
    let (rides, drivers, config) = load_ride_assignment_instance_from_json(input_data)
        .context("Error loading the instance")?;
    let start_time = stdtime::Instant::now();

    let estimator = MemoizedEstimator::new(HaversineEstimator::from_config(&config.travel));
    let engine = AssignmentEngine::new(config.clone());
    let (schedule, report) = engine.solve_with_report(rides, drivers, &estimator)?;

    let runtime_duration = start_time.elapsed();

    println!("\nFinal schedule:");
    schedule.print();

    info!(
        cached_travel_times = estimator.cached_pairs(),
        "running time: {:0.2}sec",
        runtime_duration.as_secs_f32()
    );

    Ok(create_output_json(
        schedule_to_json(&schedule),
        &report,
        runtime_duration,
    ))
}

pub fn create_output_json(
    json_schedule: serde_json::Value,
    report: &SolveReport,
    runtime_duration: stdtime::Duration,
) -> serde_json::Value {
    serde_json::json!({
        "info": {
            "runningTime": format!("{:0.2}sec", runtime_duration.as_secs_f32()),
            "numberOfThreads": rayon::current_num_threads(),
            "timestamp(UTC)": jiff::Timestamp::now().to_string(),
        },
        "objectiveValue": {
            "flowCost": report.flow_cost,
            "rewardPerRide": report.reward_per_ride,
            "augmentations": report.augmentations,
            "rounds": report.rounds,
            "compatibilityEdges": report.compatibility_edges,
            "chains": report.chains,
            "unpairedChains": report.unpaired_chains,
            "fallbackRoutes": report.fallback_routes,
        },
        "schedule": json_schedule,
    })
}
