use std::sync::Mutex;
use std::thread;
use std::time::{Duration, Instant};

use proteic::api::Chart;
use proteic::core::Config;
use proteic::datasource::{
    DatasourceEvent, Dispatcher, HttpDatasource, HttpResponse, HttpSourceConfig, HttpTransport,
    poll_once,
};
use proteic::error::{ChartError, ChartResult};
use proteic::render::NullRenderer;

/// Serves a fixed list of responses, then keeps repeating the last one.
struct Replay {
    responses: Mutex<Vec<HttpResponse>>,
}

impl Replay {
    fn new(bodies: &[(u16, &str)]) -> Self {
        let mut responses: Vec<HttpResponse> = bodies
            .iter()
            .map(|(status, body)| HttpResponse {
                status: *status,
                body: (*body).to_owned(),
            })
            .collect();
        responses.reverse();
        Self {
            responses: Mutex::new(responses),
        }
    }
}

impl HttpTransport for Replay {
    fn get(&self, _url: &str) -> ChartResult<HttpResponse> {
        let mut responses = self
            .responses
            .lock()
            .map_err(|_| ChartError::Datasource("poisoned".to_owned()))?;
        match responses.len() {
            0 => Err(ChartError::Datasource("no response scripted".to_owned())),
            1 => Ok(responses[0].clone()),
            _ => responses
                .pop()
                .ok_or_else(|| ChartError::Datasource("no response scripted".to_owned())),
        }
    }
}

struct Unreachable;

impl HttpTransport for Unreachable {
    fn get(&self, url: &str) -> ChartResult<HttpResponse> {
        Err(ChartError::Datasource(format!("connection refused: {url}")))
    }
}

#[test]
fn non_ok_status_yields_exactly_one_error_event() {
    let (dispatcher, events) = Dispatcher::channel();
    let transport = Replay::new(&[(503, "busy")]);
    assert!(poll_once(&transport, "http://localhost/data", &dispatcher));
    let received: Vec<DatasourceEvent> = events.try_iter().collect();
    assert_eq!(received.len(), 1);
    assert!(matches!(&received[0], DatasourceEvent::Error(reason) if reason.contains("503")));
}

#[test]
fn transport_failures_and_bad_bodies_are_errors_not_panics() {
    let (dispatcher, events) = Dispatcher::channel();
    poll_once(&Unreachable, "http://localhost/data", &dispatcher);
    poll_once(&Replay::new(&[(200, "{not json")]), "http://localhost/data", &dispatcher);
    let received: Vec<DatasourceEvent> = events.try_iter().collect();
    assert_eq!(received.len(), 2);
    assert!(received.iter().all(|event| matches!(event, DatasourceEvent::Error(_))));
}

#[test]
fn source_config_reads_camel_case_json() {
    let config: HttpSourceConfig =
        serde_json::from_str(r#"{"url": "http://localhost/data", "pollingTime": 250}"#).expect("config");
    assert_eq!(config, HttpSourceConfig::new("http://localhost/data").with_polling_time(250));
    let defaulted: HttpSourceConfig =
        serde_json::from_str(r#"{"url": "http://localhost/data"}"#).expect("config");
    assert_eq!(defaulted.polling_time, 1000);
}

#[test]
fn polled_payloads_reach_the_chart() {
    let transport = Replay::new(&[
        (200, r#"{"key": "A", "x": 1}"#),
        (500, ""),
        (200, r#"[{"key": "B", "x": 2}, {"key": "C", "x": 3}]"#),
        (200, "[]"),
    ]);
    let source = HttpDatasource::with_transport(
        HttpSourceConfig::new("http://localhost/data").with_polling_time(5),
        transport,
    );
    let mut chart =
        Chart::piechart(NullRenderer::default(), Vec::new(), Config::new()).expect("chart init");
    chart.datasource(Box::new(source)).expect("attach");
    chart.start_datasource().expect("start");
    assert!(chart.datasource_running());

    let deadline = Instant::now() + Duration::from_secs(5);
    while chart.data().len() < 3 && Instant::now() < deadline {
        chart.pump_events().expect("pump");
        thread::sleep(Duration::from_millis(5));
    }
    chart.stop_datasource().expect("stop");
    assert!(!chart.datasource_running());
    assert_eq!(chart.data().len(), 3);
}

#[test]
fn starting_without_a_source_fails() {
    let mut chart =
        Chart::piechart(NullRenderer::default(), Vec::new(), Config::new()).expect("chart init");
    assert!(matches!(chart.start_datasource(), Err(ChartError::Datasource(_))));
    assert_eq!(chart.pump_events().expect("pump"), 0);
}
