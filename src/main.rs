fn main() {
    ansible_config_manager::app::cli::run();
}
