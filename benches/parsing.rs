//! Performance benchmarks for mdtree
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use mdtree::{parse_blocks, parse_with_options, resolve, Options};

/// Sample Markdown documents of various sizes
mod samples {
    pub const TINY: &str = "Hello, **world**!";

    pub const SMALL: &str = r#"# Heading

This is a paragraph with *emphasis* and **strong** text.

- Item 1
- Item 2
- Item 3

`inline code` and [a link](https://example.com).
"#;

    pub const MEDIUM: &str = r#"# Project README

This is a sample README file that demonstrates various Markdown features.

## Features

- [x] Position-tracked nodes
- [ ] Streaming input
- Footnotes[^1] and tables

### Code Example

```rust
fn main() {
    println!("Hello, world!");
}
```

| Feature | Status |
| :------ | -----: |
| Tables  | done   |
| Math    | opt-in |

> This is a blockquote with some *emphasized* text.

See [Features] and www.example.com.

[^1]: Numbered by first reference.
"#;

    /// Generate a large document by repeating sections
    pub fn large() -> String {
        let section = r#"
## Section Title

This paragraph contains various inline elements like *emphasis*, **strong**,
`code`, and [links](https://example.com).

- First bullet point with **bold** text
- Second bullet point with *italic* text
- Third point with `code`

> A blockquote that spans
> multiple lines.

```rust
fn example() {
    let x = 42;
    println!("{}", x);
}
```

Another paragraph to add some content. This helps test the parser's ability
to handle longer documents efficiently.

"#;
        section.repeat(50)
    }

    /// Pathological document with many potential delimiters
    pub fn pathological_emphasis() -> String {
        "*a ".repeat(1000) + &"b* ".repeat(1000)
    }

    /// Document with deeply nested structures
    pub fn pathological_nested() -> String {
        "> ".repeat(100) + "deep\n"
    }

    /// Many unmatched brackets
    pub fn pathological_brackets() -> String {
        "[a ".repeat(2000) + &"](b) ".repeat(10)
    }
}

fn bench_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("parsing");
    let options = Options::default();

    for (name, input) in [
        ("tiny", samples::TINY.to_string()),
        ("small", samples::SMALL.to_string()),
        ("medium", samples::MEDIUM.to_string()),
        ("large", samples::large()),
    ] {
        group.throughput(Throughput::Bytes(input.len() as u64));
        group.bench_function(name, |b| b.iter(|| parse_with_options(black_box(&input), &options)));
    }

    group.finish();
}

fn bench_phases(c: &mut Criterion) {
    let mut group = c.benchmark_group("phases");
    let options = Options::default();
    let large = samples::large();
    group.throughput(Throughput::Bytes(large.len() as u64));

    group.bench_function("blocks_only", |b| b.iter(|| parse_blocks(black_box(&large), &options)));
    group.bench_function("blocks_and_resolve", |b| {
        b.iter(|| {
            parse_blocks(black_box(&large), &options).map(|(tree, maps)| resolve(tree, maps, &options))
        })
    });

    let located = Options::default().with_line_locator(true);
    group.bench_function("with_line_locator", |b| {
        b.iter(|| parse_with_options(black_box(&large), &located))
    });

    group.finish();
}

fn bench_pathological(c: &mut Criterion) {
    let mut group = c.benchmark_group("pathological");
    group.sample_size(20); // Fewer samples for slow cases
    let options = Options::default();

    for (name, input) in [
        ("emphasis_explosion", samples::pathological_emphasis()),
        ("deep_nesting", samples::pathological_nested()),
        ("unmatched_brackets", samples::pathological_brackets()),
    ] {
        group.throughput(Throughput::Bytes(input.len() as u64));
        group.bench_function(name, |b| b.iter(|| parse_with_options(black_box(&input), &options)));
    }

    group.finish();
}

criterion_group!(benches, bench_parsing, bench_phases, bench_pathological);
criterion_main!(benches);
