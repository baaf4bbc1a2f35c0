#![allow(
  clippy::expect_used,
  clippy::unwrap_used,
  reason = "Fine in benchmarks"
)]
use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use quire_markdown::{MarkdownOptions, MarkdownOptionsBuilder, MarkdownProcessor};

const POST_SMALL: &str = r"---
description: A short note
publish_date: 2024-01-01
---

# A short note

Nothing fancy, just a paragraph with a [link](https://example.com).
";

const POST_LARGE: &str = r#"---
description: Everything the pipeline knows how to do
publish_date: 2024-03-14
---

# Rasterizer notes

Triangles are cheap<fn>Until they are not, see <a href="/blog/overdraw">overdraw</a>.</fn>
and ~~fragment~~ pixel shaders are not. Single ~tildes~ stay as they are.

The edge function for a point $p$ is

$$E(p) = (p_x - a_x)(b_y - a_y) - (p_y - a_y)(b_x - a_x)$$

```rust
fn edge(a: Vec2, b: Vec2, p: Vec2) -> f32 {
    (p.x - a.x) * (b.y - a.y) - (p.y - a.y) * (b.x - a.x)
}
```

## Barycentrics

```python
def barycentric(w0, w1, w2):
    area = w0 + w1 + w2
    return w0 / area, w1 / area, w2 / area
```

```math
\lambda_i = \frac{E_i(p)}{E_0(p) + E_1(p) + E_2(p)}
```

See [the classic paper](https://www.cs.drexel.edu/~david/Classes/Papers/comp175-06-pineda.pdf)
and my [earlier post](/blog/clipping)<fn>Which also has footnotes.</fn>.

- one
- two<fn>Three, really.</fn>
- four
"#;

fn bench_render(c: &mut Criterion) {
  let mut group = c.benchmark_group("render");

  let full = MarkdownProcessor::new(MarkdownOptions::default());
  let plain = MarkdownProcessor::new(
    MarkdownOptionsBuilder::new()
      .math(false)
      .highlight_code(false)
      .build(),
  );

  group.bench_with_input(
    BenchmarkId::new("full", "small"),
    &POST_SMALL,
    |b, source| {
      b.iter(|| full.render(black_box(source)).unwrap());
    },
  );

  group.bench_with_input(
    BenchmarkId::new("full", "large"),
    &POST_LARGE,
    |b, source| {
      b.iter(|| full.render(black_box(source)).unwrap());
    },
  );

  group.bench_with_input(
    BenchmarkId::new("plain", "small"),
    &POST_SMALL,
    |b, source| {
      b.iter(|| plain.render(black_box(source)).unwrap());
    },
  );

  group.finish();
}

criterion_group!(benches, bench_render);
criterion_main!(benches);
