//! `o-saft-docker-build` entry point.

use osaft_docker_core::EnvDefaults;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let code = osaft_docker_cli::build_tool::run(&args, &EnvDefaults::from_env()).await;
    std::process::exit(code);
}
