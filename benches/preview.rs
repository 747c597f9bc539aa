//! Benchmarks for markdown conversion and session edit throughput.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use markpad::convert::{ComrakConverter, MarkdownConverter};
use markpad::session::{MarkupFragment, PreviewCompletion, Session};

fn sample_markdown() -> String {
    let mut md = String::from("# Notes\n\n");
    for i in 1..=200 {
        md.push_str(&format!(
            "## Section {i}\n\nSome *emphasis*, **strong** and `code`.\n\n- item\n- [x] done\n\n<b>Bold text</b>\n\n"
        ));
    }
    md
}

fn bench_convert(c: &mut Criterion) {
    let md = sample_markdown();
    let converter = ComrakConverter::new();

    c.bench_function("convert_200_sections", |b| {
        b.iter(|| converter.convert(black_box(&md)))
    });
}

fn bench_typing_burst(c: &mut Criterion) {
    let md = sample_markdown();

    c.bench_function("session_typing_burst_resolve_latest", |b| {
        b.iter(|| {
            let mut session = Session::with_initial(md.clone(), Default::default());
            let mut text = md.clone();
            for ch in "hello world".chars() {
                text.push(ch);
                session.edit_content(text.clone());
            }
            session.append_markup(MarkupFragment::Italic);
            let mut requests = session.take_requests();
            // Newest first, so every older completion is discarded as stale.
            requests.reverse();
            for req in requests {
                session.resolve(PreviewCompletion::new(req.seq, Ok(req.source)));
            }
            black_box(session.preview_markup().len())
        })
    });
}

criterion_group!(benches, bench_convert, bench_typing_burst);
criterion_main!(benches);
