pub use error::ApiError;
pub use error::Error;
mod boundary;
mod command;
mod conf;
mod dashboard;
mod district;
mod error;
mod export;
mod filter;
mod map;
mod photo;
mod record;
mod server;
#[cfg(test)]
mod test;
use conf::Conf;
use std::env;
use tracing_subscriber::EnvFilter;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[actix_web::main]
async fn main() -> Result<()> {
    init_logging();

    let conf = Conf::from_env()?;

    let args: Vec<String> = env::args().collect();

    let command = match args.get(1) {
        Some(some) => some,
        None => Err(Error::CLI("No actions passed".into()))?,
    };

    match command.as_str() {
        "server" => server::run(conf).await?,
        "render" => command::render::run(&args[2..], &conf).await?,
        first_arg => Err(Error::CLI(format!("Unknown command: {first_arg}")))?,
    }

    Ok(())
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if cfg!(debug_assertions) {
        builder.init();
    } else {
        builder.json().init();
    }
}
