// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Conversion throughput and native decision-function benchmarks.

use classifier_artifact::{ClassifierArtifact, InputSpec};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use graph_converter::{GraphConverter, LinearModel};
use tensor_core::{Shape, Tensor};

fn artifact(rows: usize, features: usize) -> ClassifierArtifact {
    ClassifierArtifact::new("LogisticRegression")
        .with_tensor(
            "coef",
            Tensor::from_vec(
                Shape::matrix(rows, features),
                (0..rows * features).map(|i| (i % 13) as f32 / 13.0 - 0.5).collect(),
            )
            .unwrap(),
        )
        .with_tensor("intercept", Tensor::zeros(Shape::vector(rows)))
}

fn bench_convert(c: &mut Criterion) {
    let spec = InputSpec::new("float_input", 384);
    let converter = GraphConverter::default();

    for rows in [1, 8] {
        let a = artifact(rows, 384);
        c.bench_function(&format!("convert 384 features, {rows} rows"), |bench| {
            bench.iter(|| converter.convert(black_box(&a), &spec).unwrap())
        });
    }
}

fn bench_predict_proba(c: &mut Criterion) {
    let model = LinearModel::from_artifact(&artifact(8, 384), 384).unwrap();
    let x = Tensor::from_vec(
        Shape::matrix(32, 384),
        (0..32 * 384).map(|i| (i % 7) as f32 / 7.0).collect(),
    )
    .unwrap();

    c.bench_function("predict_proba 32x384 softmax(8)", |bench| {
        bench.iter(|| model.predict_proba(black_box(&x)).unwrap())
    });
}

criterion_group!(benches, bench_convert, bench_predict_proba);
criterion_main!(benches);
