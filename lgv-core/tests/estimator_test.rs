use approx::assert_abs_diff_eq;
use lgv_core::{
    compute_lgv, compute_shot_noise, gradient, Dataset, Distribution, Evaluator, LgvError,
    ParamShape, ParamTensor, ParameterSampler, Rank, Sampler, SamplerConfig, VarianceSummary,
};
use ndarray::arr2;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::f64::consts::PI;

/// ⟨Z_0⟩ after RY(θ_00) on a single wire, extended multiplicatively over wires
fn ry_z_product() -> Evaluator {
    Evaluator::scalar_fn(|p, _| Ok(p.flatten().iter().map(|t| t.cos()).product()))
}

#[test]
fn test_single_wire_gradient_scenario() {
    // (L=1, W=1), f(θ) = cos θ at θ = π/4  ⇒  −sin(π/4)
    let p = ParamTensor::from_array2(arr2(&[[PI / 4.0]]));
    let g = gradient(&p, &ry_z_product(), None).unwrap();

    assert_eq!(g.dims(), vec![1, 1]);
    assert_abs_diff_eq!(g.get((0, 0, 0)).unwrap(), -0.70710678, epsilon = 1e-6);
}

#[test]
fn test_constant_evaluator_has_zero_gradient_and_lgv() {
    let eval = Evaluator::scalar_fn(|_, _| Ok(0.37));
    let sampler = ParameterSampler::new(SamplerConfig::new(3, 2).with_groups(2)).unwrap();
    let mut rng = StdRng::seed_from_u64(100);

    let p = sampler.sample(&mut rng);
    let g = gradient(&p, &eval, None).unwrap();
    assert!(g.flatten().iter().all(|&v| v == 0.0));

    let lgv = compute_lgv(&eval, &sampler, 5, None, &mut rng).unwrap();
    assert_eq!(lgv.dims(), vec![3, 2, 2]);
    assert!(lgv.flatten().iter().all(|&v| v == 0.0));
}

#[test]
fn test_lgv_shrinks_with_product_width() {
    // Var ∂/∂θ_0 Π cos θ_i = (1/2)^W under θ ~ U[-π, π]
    let mut previous = f64::INFINITY;
    for wires in [1usize, 2, 3, 4] {
        let sampler = ParameterSampler::new(SamplerConfig::new(1, wires)).unwrap();
        let mut rng = StdRng::seed_from_u64(77);
        let lgv = compute_lgv(&ry_z_product(), &sampler, 3000, None, &mut rng).unwrap();
        let summary = VarianceSummary::of(&lgv);

        let expected = 0.5_f64.powi(wires as i32);
        assert_abs_diff_eq!(summary.mean, expected, epsilon = 0.15 * expected);
        assert!(summary.mean < previous);
        previous = summary.mean;
    }
}

#[test]
fn test_normal_sampler_concentrates_gradients() {
    // Small angles keep ∂ cos θ near zero
    let mut rng = StdRng::seed_from_u64(12);
    let uniform = ParameterSampler::new(SamplerConfig::new(1, 2)).unwrap();
    let narrow = ParameterSampler::new(
        SamplerConfig::new(1, 2).with_distribution(Distribution::normal()),
    )
    .unwrap();

    let wide = compute_lgv(&ry_z_product(), &uniform, 200, None, &mut rng).unwrap();
    let tight = compute_lgv(&ry_z_product(), &narrow, 200, None, &mut rng).unwrap();
    assert!(tight.mean() < wide.mean() / 10.0);
}

#[test]
fn test_dataset_rows_reach_evaluator() {
    let data = Dataset::new(vec![vec![2.0], vec![-2.0]]);
    let eval = Evaluator::scalar_fn(|p, x| {
        let x = x.ok_or_else(|| LgvError::Evaluation("missing input".into()))?;
        Ok(x[0] * p.flatten()[0].sin())
    });
    let params = ParamTensor::from_flat(ParamShape::new(1, 1, 1), Rank::Two, vec![0.0]).unwrap();
    let mut rng = StdRng::seed_from_u64(31);

    // g = x0 · cos 0 = ±2, so the variance over enough repeats is about 4
    let noise = compute_shot_noise(&eval, &params, 200, Some(&data), &mut rng).unwrap();
    assert_abs_diff_eq!(noise.get((0, 0, 0)).unwrap(), 4.0, epsilon = 0.5);

    // Without a dataset the evaluator is called with no input
    let err = compute_shot_noise(&eval, &params, 2, None, &mut rng).unwrap_err();
    assert_eq!(err, LgvError::Evaluation("missing input".into()));
}

#[test]
fn test_degenerate_summaries_do_not_abort() {
    let sampler = ParameterSampler::new(SamplerConfig::new(2, 2)).unwrap();
    let mut rng = StdRng::seed_from_u64(0);

    let lgv = compute_lgv(&ry_z_product(), &sampler, 1, None, &mut rng).unwrap();
    let p = sampler.sample(&mut rng);
    let noise = compute_shot_noise(&ry_z_product(), &p, 0, None, &mut rng).unwrap();

    assert!(VarianceSummary::of(&lgv).mean.is_nan());
    assert!(VarianceSummary::of(&noise).max.is_nan());
    assert_eq!(noise.dims(), vec![2, 2, 1]);
}
