use raft_sled_store::LogStore;
use raft_sled_store::Result;
use raft_sled_store::SledStore;
use raft_sled_store::StoreConfig;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::Layer;

/// Opens the store named by the layered configuration and reports its log
/// boundaries. Useful to inspect a node's persisted log after a crash.
fn main() -> Result<()> {
    init_observability();

    let settings = StoreConfig::new()?.validate()?;
    let store = SledStore::from_config(&settings)?;

    let first = store.first_index()?;
    let last = store.last_index()?;
    info!(first, last, len = store.len(), "raft log boundaries");

    println!("data_dir:    {}", settings.data_dir.display());
    println!("first_index: {first}");
    println!("last_index:  {last}");
    println!("entries:     {}", store.len());
    println!("disk bytes:  {}", store.size_on_disk()?);

    store.close()
}

fn init_observability() {
    let base_subscriber = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_default_env());
    tracing_subscriber::registry().with(base_subscriber).init();
}
