fn main() -> Result<(), eframe::Error> {
    // Set up logging for development
    env_logger::init();

    // Run the planner application
    socket_plate_planner::run_app()
}
