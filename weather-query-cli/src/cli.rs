use std::{io::Write, process::ExitCode};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{Subscriber, info};
use tracing_subscriber::{
    EnvFilter, fmt::MakeWriter, layer::SubscriberExt, util::SubscriberInitExt,
};
use weather_query_core::{
    OpenWeatherSource, QueryError, QuerySettings, WeatherReading, config::OPENWEATHER_ENDPOINT,
    query_weather,
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "weather-query",
    version,
    about = "Print the current weather in London from OpenWeather"
)]
pub struct Cli {
    /// Increase log output on stderr (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Current-weather endpoint URL.
    #[arg(long, hide = true, default_value = OPENWEATHER_ENDPOINT)]
    pub endpoint: String,
}

impl Cli {
    pub async fn run(self) -> Result<ExitCode> {
        init_tracing(self.verbose);

        let settings = QuerySettings::default().with_endpoint(self.endpoint);
        let api_key = crate::prompt::read_credential()?;
        info!(city = %settings.city, units = %settings.units, "querying weather");

        let source = OpenWeatherSource::with_settings(api_key, &settings);
        let result = query_weather(&source, &settings.request()).await;

        let stdout = std::io::stdout();
        let stderr = std::io::stderr();
        report(result, &mut stdout.lock(), &mut stderr.lock())
    }
}

fn log_filter_from_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn log_subscriber<W>(verbose: u8, make_writer: W) -> impl Subscriber + Send + Sync + 'static
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::registry()
        .with(EnvFilter::new(log_filter_from_verbosity(verbose)))
        .with(tracing_subscriber::fmt::layer().with_writer(make_writer))
}

/// Logs share stderr with the error lines, so the default filter must stay quiet on them.
fn init_tracing(verbose: u8) {
    log_subscriber(verbose, std::io::stderr).init();
}

/// Print the terminal state of a query. A malformed payload is returned as a fatal error.
fn report(
    result: Result<WeatherReading, QueryError>,
    out: &mut impl Write,
    err: &mut impl Write,
) -> Result<ExitCode> {
    match result {
        Ok(reading) => {
            write!(out, "{reading}").context("Failed to write weather reading")?;
            Ok(ExitCode::SUCCESS)
        }
        Err(e) if e.is_reportable() => {
            writeln!(err, "{e}").context("Failed to write error message")?;
            Ok(ExitCode::FAILURE)
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::{
        io,
        sync::{Arc, Mutex},
    };
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path},
    };

    /// Cloneable in-memory sink standing in for stderr.
    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl SharedBuf {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl io::Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().write(buf)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// Run one query with the default log subscriber installed and return
    /// stdout plus everything that reached "stderr" (logs and error line).
    async fn run_with_default_logging(settings: QuerySettings) -> (ExitCode, String, String) {
        let stderr = SharedBuf::default();
        let log_sink = stderr.clone();
        let _guard = tracing::subscriber::set_default(log_subscriber(0, move || log_sink.clone()));

        let source = OpenWeatherSource::with_settings("KEY".to_string(), &settings);
        let result = query_weather(&source, &settings.request()).await;

        let mut out = Vec::new();
        let mut err = stderr.clone();
        let code = report(result, &mut out, &mut err).unwrap();
        (code, String::from_utf8(out).unwrap(), stderr.contents())
    }

    fn capture(result: Result<WeatherReading, QueryError>) -> (Result<ExitCode>, String, String) {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let code = report(result, &mut out, &mut err);
        (code, String::from_utf8(out).unwrap(), String::from_utf8(err).unwrap())
    }

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn endpoint_defaults_to_openweather() {
        let cli = Cli::try_parse_from(["weather-query"]).unwrap();
        assert_eq!(cli.endpoint, OPENWEATHER_ENDPOINT);
        assert_eq!(cli.verbose, 0);

        let cli = Cli::try_parse_from(["weather-query", "-vv", "--endpoint", "http://localhost:8080/w"])
            .unwrap();
        assert_eq!(cli.endpoint, "http://localhost:8080/w");
        assert_eq!(log_filter_from_verbosity(cli.verbose), "debug");
    }

    #[test]
    fn reading_goes_to_stdout() {
        let reading = WeatherReading {
            status: 200,
            units: weather_query_core::Units::Metric,
            temperature: 7.0,
            condition: "mist".to_string(),
            humidity_pct: 93,
            wind_speed: 2.57,
            location_name: None,
            observation_time: None,
        };

        let (code, out, err) = capture(Ok(reading));

        assert_eq!(code.unwrap(), ExitCode::SUCCESS);
        assert_eq!(out, "Temperature: 7.0°C\nWeather: mist\nHumidity: 93%\nWind Speed: 2.57 m/s\n");
        assert!(err.is_empty());
    }

    #[test]
    fn api_error_is_exact_line_on_stderr() {
        let (code, out, err) = capture(Err(QueryError::Api {
            status: "404".into(),
            message: "city not found".to_string(),
        }));

        assert_eq!(code.unwrap(), ExitCode::FAILURE);
        assert!(out.is_empty());
        assert_eq!(err, "Error: city not found\n");
    }

    #[test]
    fn transport_error_is_exact_line_on_stderr() {
        let (code, out, err) = capture(Err(QueryError::Transport {
            detail: "error sending request: connection refused".to_string(),
        }));

        assert_eq!(code.unwrap(), ExitCode::FAILURE);
        assert!(out.is_empty());
        assert_eq!(err, "Request failed: error sending request: connection refused\n");
    }

    #[test]
    fn malformed_payload_is_fatal() {
        let (code, out, err) =
            capture(Err(QueryError::MalformedPayload("missing field `main`".to_string())));

        let fatal = code.unwrap_err();
        assert!(fatal.to_string().contains("missing field `main`"));
        assert!(out.is_empty());
        assert!(err.is_empty());
    }

    #[tokio::test]
    async fn refused_connection_prints_one_stderr_line_at_default_verbosity() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let settings = QuerySettings::default()
            .with_endpoint(format!("http://127.0.0.1:{port}/data/2.5/weather"));

        let (code, out, err) = run_with_default_logging(settings).await;

        assert_eq!(code, ExitCode::FAILURE);
        assert!(out.is_empty());
        assert_eq!(err.lines().count(), 1, "stderr was: {err:?}");
        assert!(err.starts_with("Request failed: "), "stderr was: {err:?}");
    }

    #[tokio::test]
    async fn api_error_prints_exactly_the_error_line_at_default_verbosity() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .respond_with(
                ResponseTemplate::new(404)
                    .set_body_json(serde_json::json!({ "cod": "404", "message": "city not found" })),
            )
            .mount(&server)
            .await;
        let settings =
            QuerySettings::default().with_endpoint(format!("{}/data/2.5/weather", server.uri()));

        let (code, out, err) = run_with_default_logging(settings).await;

        assert_eq!(code, ExitCode::FAILURE);
        assert!(out.is_empty());
        assert_eq!(err, "Error: city not found\n");
    }
}
