use espflow::configuration::get_configuration;
use espflow::telemetry::get_subscriber;
use espflow::telemetry::init_subscriber;
use espflow::workflow::WorkflowRunner;
use once_cell::sync::Lazy;
use secrecy::Secret;
use wiremock::MockServer;

/// Init a static subscriber once for the whole test binary.
///
/// To opt in to verbose logging, use the env var `TEST_LOG`:
///
/// ```sh
///      TEST_LOG=true cargo test [test_name] | bunyan
/// ```
static TRACING: Lazy<()> = Lazy::new(|| {
    // the intuitive solution of assigning 2 different "closure types" to the
    // same var is not allowed by the compiler, hence the duplicated arms
    match std::env::var("TEST_LOG") {
        Ok(_) => {
            let subscriber = get_subscriber("test", "debug", std::io::stdout);
            init_subscriber(subscriber);
        }
        Err(_) => {
            let subscriber = get_subscriber("test", "debug", std::io::sink);
            init_subscriber(subscriber);
        }
    };
});

/// The keys the runner starts out with, before any sub-account is created or
/// adopted; request assertions match on these
pub const TEST_ACCOUNT_KEY: &str = "account-key";
pub const TEST_SUB_ACCOUNT_KEY: &str = "sub-account-key";

pub struct TestEsp {
    /// Simulates the remote provider; mount per-test mocks on it
    pub server: MockServer,
    pub runner: WorkflowRunner,
}

/// Start a mock provider and build a workflow runner pointed at it. The real
/// configuration is loaded first, then `base_url` and both keys are
/// overridden, so the config layer stays on the tested path.
pub async fn spawn_workflow() -> TestEsp {
    // init the tracing subscriber once only
    Lazy::force(&TRACING);

    let server = MockServer::start().await;

    let cfg = {
        let mut cfg = get_configuration().unwrap();
        cfg.esp.base_url = server.uri();
        cfg.esp.account_api_key = Secret::new(TEST_ACCOUNT_KEY.to_string());
        cfg.esp.sub_account_api_key = Secret::new(TEST_SUB_ACCOUNT_KEY.to_string());
        cfg
    };

    let runner = WorkflowRunner::new(cfg.esp.client());

    TestEsp { server, runner }
}
