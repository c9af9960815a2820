fn main() {
    mvn_depgraph::cli::run();
}
