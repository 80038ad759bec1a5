use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use sieve_predicates::{
    InterfaceRegistry, MatchDict, PredicateConfig, PredicateList, RequestInfo, RouteInfo,
    TraversePredicate,
};

fn candidate(id: usize) -> PredicateList {
    let config = PredicateConfig {
        request_method: Some(["GET", "HEAD"].into()),
        path_info: Some(format!(r"/api/v\d+/endpoint{id}$")),
        header: Some("Accept:application/".to_string()),
        ..PredicateConfig::default()
    };
    config
        .compile(&InterfaceRegistry::new())
        .unwrap()
        .predicates
}

fn first_match<'a>(
    candidates: &'a [PredicateList],
    request: &RequestInfo,
) -> Option<&'a PredicateList> {
    candidates.iter().find(|c| c.matches(None, request))
}

fn bench_candidate_selection(c: &mut Criterion) {
    let mut group = c.benchmark_group("candidate_selection");

    for count in [10, 50, 100, 500].iter() {
        let candidates: Vec<PredicateList> = (0..*count).map(candidate).collect();

        let request_first = RequestInfo::new("GET", "/api/v1/endpoint0")
            .with_header("Accept", "application/json");
        let last = count - 1;
        let request_last = RequestInfo::new("GET", format!("/api/v1/endpoint{last}"))
            .with_header("Accept", "application/json");
        // Fails on the method, the cheapest predicate
        let request_none = RequestInfo::new("POST", "/api/v1/endpoint0");

        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::new("match_first", count), count, |b, _| {
            b.iter(|| first_match(black_box(&candidates), black_box(&request_first)));
        });
        group.bench_with_input(BenchmarkId::new("match_last", count), count, |b, _| {
            b.iter(|| first_match(black_box(&candidates), black_box(&request_last)));
        });
        group.bench_with_input(BenchmarkId::new("match_none", count), count, |b, _| {
            b.iter(|| first_match(black_box(&candidates), black_box(&request_none)));
        });
    }

    group.finish();
}

fn bench_identity(c: &mut Criterion) {
    let mut group = c.benchmark_group("identity");
    let list = candidate(0);

    group.bench_function("discriminator", |b| {
        b.iter(|| black_box(&list).discriminator());
    });

    group.finish();
}

fn bench_traverse(c: &mut Criterion) {
    let mut group = c.benchmark_group("traverse");
    let traverse = TraversePredicate::new("/sites/{site}/pages/*subpath");
    let matchdict: MatchDict = [("site", "main"), ("subpath", "docs/intro/getting started")]
        .into_iter()
        .collect();

    group.bench_function("apply", |b| {
        b.iter(|| {
            let mut info = RouteInfo::new(matchdict.clone());
            traverse.apply(black_box(&mut info))
        });
    });

    group.finish();
}

criterion_group!(benches, bench_candidate_selection, bench_identity, bench_traverse);
criterion_main!(benches);
