#![cfg(test)]

use ndarray::array;
use rand::{rngs::StdRng, SeedableRng};

use crate::{
    activations::ActFn,
    dataset::VectorSample,
    layers::{Dense, Layer},
    network::Network,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn network_fits_a_line_with_a_single_dense_layer() {
    init_logging();

    let samples: Vec<VectorSample> = (0..100)
        .map(|i| {
            let x = i as f64 / 100.0;
            VectorSample::new(array![x], array![3.0 * x + 7.0])
        })
        .collect();

    let mut rng = StdRng::seed_from_u64(42);
    let mut net = Network::new();
    net.add_layer(Layer::dense(1, 1, &mut rng));

    net.train(&samples, &samples, 10, 0.05, 200, true).unwrap();

    let at_zero = net.compute(array![0.0].view()).unwrap()[0];
    let at_one = net.compute(array![1.0].view()).unwrap()[0];

    let bias = at_zero;
    let weight = at_one - at_zero;

    assert!((weight - 3.0).abs() < 0.5, "weight converged to {weight}");
    assert!((bias - 7.0).abs() < 0.5, "bias converged to {bias}");
}

#[test]
fn deep_pipeline_learns_xor() {
    init_logging();

    let samples = vec![
        VectorSample::new(array![0.0, 0.0], array![0.0]),
        VectorSample::new(array![0.0, 1.0], array![1.0]),
        VectorSample::new(array![1.0, 0.0], array![1.0]),
        VectorSample::new(array![1.0, 1.0], array![0.0]),
    ];

    let mut rng = StdRng::seed_from_u64(7);
    let mut net = Network::new();
    net.add_layer(Layer::dense(2, 8, &mut rng));
    net.add_layer(Layer::activation(ActFn::Tanh));
    net.add_layer(Layer::dense(8, 1, &mut rng));
    net.add_layer(Layer::activation(ActFn::Sigmoid));

    net.train(&samples, &samples, 4, 0.05, 5000, false).unwrap();

    for sample in &samples {
        let prediction = net.compute(sample.data()).unwrap()[0];
        let target = sample.label()[0];
        assert!(
            (prediction - target).abs() < 0.3,
            "xor({:?}) predicted {prediction}, wanted {target}",
            sample.data()
        );
    }
}

#[test]
fn softmax_head_trains_a_one_hot_classifier() {
    init_logging();

    // Three linearly separable clusters, one-hot labels.
    let mut samples = Vec::new();
    for i in 0..20 {
        let offset = i as f64 / 100.0;
        samples.push(VectorSample::new(
            array![1.0 + offset, 0.0],
            array![1.0, 0.0, 0.0],
        ));
        samples.push(VectorSample::new(
            array![0.0, 1.0 + offset],
            array![0.0, 1.0, 0.0],
        ));
        samples.push(VectorSample::new(
            array![-1.0 - offset, -1.0 - offset],
            array![0.0, 0.0, 1.0],
        ));
    }

    let mut rng = StdRng::seed_from_u64(3);
    let mut net = Network::new();
    net.add_layer(Layer::dense(2, 3, &mut rng));
    net.add_layer(Layer::activation(ActFn::Softmax));

    net.train(&samples, &samples, 10, 0.05, 500, false).unwrap();

    assert!(net.accuracy(&samples).unwrap() > 0.95);
    assert!(net.loss(&samples).unwrap() < 0.5);
}

#[test]
fn fixed_dense_layer_matches_the_worked_example() {
    let mut net = Network::new();
    net.add_layer(Layer::Dense(
        Dense::from_parts(array![[2.0, 3.0]], array![0.0]).unwrap(),
    ));

    let y = net.compute(array![1.0, 1.0].view()).unwrap();
    assert_eq!(y, array![5.0]);
}
