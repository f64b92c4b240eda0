//! Benchmarks for editing and undo history.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use notemark::history::{History, Snapshot};
use notemark::prelude::*;

fn bench_typing(c: &mut Criterion) {
    c.bench_function("typing_1k_chars", |b| {
        b.iter(|| {
            let mut session =
                EditorSession::new("", Converter::with_default_colors(), History::default());
            for ch in "the quick brown fox\n".chars().cycle().take(1000) {
                let code = if ch == '\n' {
                    KeyCode::Enter
                } else {
                    KeyCode::Char(ch)
                };
                session.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
            }
            black_box(session.buffer().len_chars())
        });
    });
}

fn bench_history_churn(c: &mut Criterion) {
    c.bench_function("history_force_save_churn", |b| {
        b.iter(|| {
            let mut history = History::new(1, 200);
            for i in 0..1000 {
                history.force_save(Snapshot::new(format!("text {i}"), i, i));
            }
            while history.undo().is_ok() {}
            black_box(history.redo_len())
        });
    });
}

criterion_group!(benches, bench_typing, bench_history_churn);
criterion_main!(benches);
