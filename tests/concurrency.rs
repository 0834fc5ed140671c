use multiaddr_core::resolve::{Resolvers, StaticResolver};
use multiaddr_core::utils::global_metrics;
use multiaddr_core::Multiaddr;

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn concurrent_parse_and_encode_heavy() {
    use tokio::task::JoinSet;

    let iterations = 10_000usize;
    let before = global_metrics().snapshot().addresses_parsed;

    let mut tasks = JoinSet::new();
    for worker in 0..8u16 {
        tasks.spawn(async move {
            for i in 0..iterations {
                let port = (i as u16).wrapping_add(worker);
                let text = format!("/ip4/10.0.{}.{}/tcp/{port}/ws", worker, i % 256);
                let addr: Multiaddr = text.parse().unwrap();
                assert_eq!(addr.to_string(), text);

                let copy = Multiaddr::from_bytes(addr.to_bytes()).unwrap();
                assert_eq!(copy, addr);
                assert_eq!(copy.decapsulate_code(477).encapsulate(&"/ws".parse().unwrap()), addr);
            }
        });
    }

    while let Some(res) = tasks.join_next().await {
        res.unwrap();
    }

    // every task parses text, bytes and "/ws" once per iteration
    let parsed = global_metrics().snapshot().addresses_parsed - before;
    assert!(parsed >= (8 * iterations * 3) as u64);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_resolution_shares_resolvers() {
    use tokio::task::JoinSet;

    let resolvers = Resolvers::new();
    let mut table = StaticResolver::new();
    for n in 0..64 {
        table.insert(
            format!("host{n}.example"),
            vec![format!("/ip4/10.1.0.{n}/tcp/443").parse().unwrap()],
        );
    }
    resolvers.register("dns4", table).unwrap();

    let mut tasks = JoinSet::new();
    for n in 0..64 {
        let resolvers = resolvers.clone();
        tasks.spawn(async move {
            let name: Multiaddr = format!("/dns4/host{n}.example/tcp/443").parse().unwrap();
            let resolved = resolvers.resolve(&name).await.unwrap();
            assert_eq!(resolved[0].to_string(), format!("/ip4/10.1.0.{n}/tcp/443"));
        });
    }

    while let Some(res) = tasks.join_next().await {
        res.unwrap();
    }

    let snapshot = resolvers.metrics().snapshot();
    assert_eq!(snapshot.resolutions_total, 64);
    assert_eq!(snapshot.resolutions_success, 64);
}
