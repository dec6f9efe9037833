use criterion::{Criterion, black_box, criterion_group, criterion_main};
use firewall::{DiagnosticsConfig, Firewall, FirewallConfig};

const CLEAN_BLOCK: &str =
    "<div class=box><p>Some <b>bold</b> text &amp; a <a href=\"/next\">link</a>.</p></div>\n";
const HOSTILE_BLOCK: &str = "<div onclick=\"steal()\"><script>evil()</script>\
    <a href=\"java&#x09;script:x\" title=\"t\">x</a><img src=x onerror=y><marquee>m</marquee></div>\n";
const SMALL_BLOCKS: usize = 64;
const LARGE_BLOCKS: usize = 10_000;

fn make_page(block: &str, blocks: usize) -> String {
    format!("<html><body>{}</body></html>", block.repeat(blocks))
}

fn quiet_firewall() -> Firewall {
    Firewall::new(FirewallConfig::default().with_diagnostics(DiagnosticsConfig::disabled()))
}

fn bench_clean_small(c: &mut Criterion) {
    let firewall = quiet_firewall();
    let input = make_page(CLEAN_BLOCK, SMALL_BLOCKS);
    c.bench_function("bench_firewall_clean_small", |b| {
        b.iter(|| black_box(firewall.sanitize(black_box(&input)).map(|out| out.len())));
    });
}

fn bench_clean_large(c: &mut Criterion) {
    let firewall = quiet_firewall();
    let input = make_page(CLEAN_BLOCK, LARGE_BLOCKS);
    c.bench_function("bench_firewall_clean_large", |b| {
        b.iter(|| black_box(firewall.sanitize(black_box(&input)).map(|out| out.len())));
    });
}

fn bench_hostile_large(c: &mut Criterion) {
    let firewall = quiet_firewall();
    let input = make_page(HOSTILE_BLOCK, LARGE_BLOCKS);
    c.bench_function("bench_firewall_hostile_large", |b| {
        b.iter(|| black_box(firewall.sanitize(black_box(&input)).map(|out| out.len())));
    });
}

fn bench_many_segments(c: &mut Criterion) {
    let firewall = quiet_firewall();
    let input = make_page(CLEAN_BLOCK, 4).repeat(1_000);
    c.bench_function("bench_firewall_many_segments", |b| {
        b.iter(|| black_box(firewall.sanitize(black_box(&input)).map(|out| out.len())));
    });
}

criterion_group!(
    benches,
    bench_clean_small,
    bench_clean_large,
    bench_hostile_large,
    bench_many_segments
);
criterion_main!(benches);
