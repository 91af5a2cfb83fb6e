fn main() {
    depscope::cli::run();
}
