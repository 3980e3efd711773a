//! Read/write throughput over a medium nested document, against the DOM path
//! as a baseline.

use criterion::{Criterion, black_box, criterion_group, criterion_main};

#[derive(Debug, Default, PartialEq, Clone)]
struct Point {
    x: f64,
    y: f64,
    z: f64,
}

jsonbind::bind_object!(Point {
    "x" => x,
    "y" => y,
    "z" => z,
});

#[derive(Debug, Default, PartialEq, Clone)]
struct Track {
    id: u64,
    name: String,
    points: Vec<Point>,
    closed: bool,
}

jsonbind::bind_object!(Track {
    "id" => id,
    "name" => name,
    "points" => points,
    "closed" => closed: OPTIONAL,
});

fn sample_input() -> String {
    let mut track = Track {
        id: 42,
        name: "perimeter".to_string(),
        points: Vec::new(),
        closed: true,
    };
    for i in 0..256 {
        track.points.push(Point {
            x: f64::from(i) * 0.25,
            y: f64::from(i) * -1.5,
            z: 10.0,
        });
    }
    jsonbind::to_string(&track).unwrap()
}

fn bench_bind(c: &mut Criterion) {
    let input = sample_input();

    c.bench_function("read_typed", |b| {
        let mut track = Track::default();
        b.iter(|| {
            jsonbind::from_str(black_box(&input), &mut track).unwrap();
            black_box(&track);
        });
    });

    c.bench_function("read_typed_reused_state", |b| {
        let mut track = Track::default();
        let mut state = <Track as jsonbind::Bind>::State::default();
        let options = jsonbind::ReadOptions::default();
        b.iter(|| {
            jsonbind::read_str_with(black_box(&input), &mut track, &mut state, &options).unwrap();
            black_box(&track);
        });
    });

    c.bench_function("read_dom", |b| {
        let mut doc = jsonbind::Value::Null;
        b.iter(|| {
            jsonbind::from_str(black_box(&input), &mut doc).unwrap();
            black_box(&doc);
        });
    });

    c.bench_function("write_typed", |b| {
        let mut track = Track::default();
        jsonbind::from_str(&input, &mut track).unwrap();
        b.iter(|| black_box(jsonbind::to_string(&track).unwrap()));
    });
}

criterion_group!(benches, bench_bind);
criterion_main!(benches);
