use std::time::Instant;

use log::info;

use city_tour_core::{
    CancelToken, Instance, Result, SolverOptions, logging, solve_instance, write_solved,
};

fn main() -> Result<()> {
    let now = Instant::now();
    let options = SolverOptions::from_args()?;
    logging::init_logger(&options)?;

    info!("options: {options}");

    let instance = Instance::load(&options)?;
    let solved = solve_instance(&instance, &options, CancelToken::interruptible())?;
    write_solved(&solved, &options)?;

    info!(
        "output: n={} total={:.1} time={:.2}s",
        instance.len(),
        solved.total(),
        now.elapsed().as_secs_f32()
    );

    Ok(())
}
