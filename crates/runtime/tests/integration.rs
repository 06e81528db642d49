// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Integration tests: runtime creation, delegate fallback and the full
//! preprocess → load → invoke → read → postprocess call, against the
//! reference engine and a scripted engine.

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use common::{
    depth_model, quantized_model, reference_model, vector_model, Recorder, Script,
    ScriptedBackend,
};
use engine::reference::{Accelerator, OpSpec, ReferenceBackend};
use engine::ModelBytes;
use operators::{
    FnOperator, MinMaxOperator, OperatorError, OperatorPipeline, PipelineError,
    RgbNormalizeOperator,
};
use runtime::{
    CreateError, InferenceRuntime, ModelPreset, RunError, RuntimeBuilder, RuntimeConfig,
    DELEGATE_FALLBACK_WARNING,
};
use tensor_codec::{ElementCountMismatch, LoadInputError, TensorRole};
use tensor_core::{ElementType, Shape, Status, TensorInfo};

// ── Helpers ────────────────────────────────────────────────────

fn cpu_runtime(model: ModelBytes, recorder: &Recorder) -> InferenceRuntime<ReferenceBackend> {
    RuntimeBuilder::new()
        .use_accelerator(false)
        .callbacks(recorder.callbacks())
        .build(&ReferenceBackend::new(), model)
        .unwrap()
}

fn counting_operator(calls: &Arc<AtomicUsize>) -> impl operators::Operator {
    let calls = Arc::clone(calls);
    FnOperator::new("count", move |_: &mut [f32]| {
        calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    })
}

// ── End to end ─────────────────────────────────────────────────

#[test]
fn test_depth_pipeline_output_in_unit_range() {
    let dir = tempfile::tempdir().unwrap();
    let recorder = Recorder::new();
    let backend = ReferenceBackend::new();

    let mut rt = InferenceRuntime::create(
        &backend,
        depth_model(256, 256),
        dir.path(),
        "depth_1",
        recorder.callbacks(),
        OperatorPipeline::new().with(RgbNormalizeOperator::default()),
        OperatorPipeline::new().with(MinMaxOperator),
    )
    .unwrap();

    assert_eq!(rt.input_len(), 256 * 256 * 3);
    assert_eq!(rt.output_len(), 256 * 256);

    let mut input: Vec<f32> = (0..rt.input_len()).map(|i| (i % 256) as f32).collect();
    let mut output = vec![-1.0f32; rt.output_len()];
    rt.run_inference(&mut input, &mut output).unwrap();

    assert!(output.iter().all(|v| (0.0..=1.0).contains(v)));
    assert!(recorder.warnings().is_empty());
    assert!(recorder.errors().is_empty());
    assert_eq!(rt.metrics().runs, 1);
}

#[test]
fn test_preset_from_config() {
    let config = RuntimeConfig {
        preset: ModelPreset::DepthEstimation,
        use_accelerator: false,
        enable_profiling: true,
        num_threads: Some(2),
        ..Default::default()
    };
    let mut rt = RuntimeBuilder::from_config(&config)
        .build(&ReferenceBackend::new(), depth_model(4, 4))
        .unwrap();

    assert_eq!(rt.pipelines().input.names(), vec!["rgb_normalize"]);
    assert_eq!(rt.pipelines().output.names(), vec!["min_max"]);
    assert_eq!(rt.num_threads(), Some(2));

    let mut input = vec![100.0; rt.input_len()];
    let mut output = vec![0.0; rt.output_len()];
    rt.run_inference(&mut input, &mut output).unwrap();
    // Constant image, constant depth.
    assert!(output.iter().all(|&v| v == 0.5));

    let report = rt.profiling_frame().unwrap().finish();
    let names: Vec<&str> = report.scopes.iter().map(|s| s.name).collect();
    assert_eq!(
        names,
        vec!["run_inference", "preprocess", "load_input", "invoke", "read_output", "postprocess"]
    );
    assert_eq!(report.scopes[0].depth, 0);
    assert!(report.scopes[1..].iter().all(|s| s.depth == 1));
}

#[test]
fn test_quantized_model_round_trip() {
    let recorder = Recorder::new();
    let mut rt = cpu_runtime(quantized_model(4), &recorder);

    let mut input = vec![0.0, 0.0, 0.0, 0.2, 0.2, 0.2, 0.4, 0.4, 0.4, 0.6, 0.6, 0.6];
    let mut output = vec![0.0; 4];
    rt.run_inference(&mut input, &mut output).unwrap();

    for (got, want) in output.iter().zip([0.0, 0.2, 0.4, 0.6]) {
        assert!((got - want).abs() <= 2.0 / 255.0, "got {got}, want {want}");
    }
}

// ── Delegate handling ──────────────────────────────────────────

#[test]
fn test_missing_accelerator_falls_back_with_one_warning() {
    let recorder = Recorder::new();
    let backend = ReferenceBackend::new().with_accelerator(Accelerator::Unavailable);

    let mut rt = RuntimeBuilder::new()
        .callbacks(recorder.callbacks())
        .build(&backend, vector_model(4, vec![OpSpec::Relu]))
        .unwrap();

    assert_eq!(recorder.warnings(), vec![DELEGATE_FALLBACK_WARNING.to_string()]);
    assert!(recorder.errors().is_empty());
    assert!(!rt.is_accelerated());

    let mut input = [-1.0, 2.0, -3.0, 4.0];
    let mut output = [0.0; 4];
    rt.run_inference(&mut input, &mut output).unwrap();
    assert_eq!(output, [0.0, 2.0, 0.0, 4.0]);
}

#[test]
fn test_refused_graph_releases_delegate() {
    let recorder = Recorder::new();
    let backend = ReferenceBackend::new().with_accelerator(Accelerator::Incompatible);

    let rt = RuntimeBuilder::new()
        .callbacks(recorder.callbacks())
        .build(&backend, vector_model(4, vec![]))
        .unwrap();

    assert_eq!(recorder.warnings().len(), 1);
    assert!(recorder.errors().is_empty());
    assert!(!rt.is_accelerated());
    assert_eq!(backend.stats().delegates_created(), 1);
    assert_eq!(backend.stats().live_delegates(), 0);
}

#[test]
fn test_accelerated_runtime_owns_delegate() {
    let backend = ReferenceBackend::new();
    let rt = RuntimeBuilder::new()
        .callbacks(Recorder::new().callbacks())
        .build(&backend, vector_model(4, vec![]))
        .unwrap();

    assert!(rt.is_accelerated());
    assert_eq!(backend.stats().live_delegates(), 1);
    drop(rt);
    assert_eq!(backend.stats().live_delegates(), 0);
}

#[test]
fn test_disabled_accelerator_skips_delegate_silently() {
    let recorder = Recorder::new();
    let backend = ReferenceBackend::new();
    let rt = RuntimeBuilder::new()
        .use_accelerator(false)
        .callbacks(recorder.callbacks())
        .build(&backend, vector_model(4, vec![]))
        .unwrap();

    assert!(!rt.is_accelerated());
    assert!(recorder.warnings().is_empty());
    assert_eq!(backend.stats().delegates_created(), 0);
}

#[test]
fn test_second_creation_reuses_delegate_cache() {
    let dir = tempfile::tempdir().unwrap();
    let backend = ReferenceBackend::new();
    let build = || {
        RuntimeBuilder::new()
            .delegate_cache(dir.path(), "vector.json_7")
            .callbacks(Recorder::new().callbacks())
            .build(&backend, vector_model(8, vec![OpSpec::Sigmoid]))
            .unwrap()
    };

    drop(build());
    assert!(dir.path().join("vector.json_7.delegate.json").exists());
    drop(build());

    assert_eq!(backend.stats().delegate_compilations(), 1);
    assert_eq!(backend.stats().delegate_cache_hits(), 1);
}

#[test]
fn test_scripted_fallback_and_teardown_order() {
    let recorder = Recorder::new();
    let backend = ScriptedBackend::new(Script {
        delegated_interpreter_fails: true,
        ..Default::default()
    });

    let rt = RuntimeBuilder::new()
        .callbacks(recorder.callbacks())
        .build(&backend, ModelBytes::from(vec![1u8]))
        .unwrap();
    assert_eq!(recorder.warnings().len(), 1);
    assert!(recorder.errors().is_empty());
    assert_eq!(backend.releases(), vec!["delegate"]);

    drop(rt);
    assert_eq!(backend.releases(), vec!["delegate", "interpreter", "model"]);
}

#[test]
fn test_scripted_teardown_with_attached_delegate() {
    let backend = ScriptedBackend::new(Script::default());
    let rt = RuntimeBuilder::new()
        .callbacks(Recorder::new().callbacks())
        .build(&backend, ModelBytes::from(vec![1u8]))
        .unwrap();
    assert!(rt.is_accelerated());
    assert!(backend.releases().is_empty());

    drop(rt);
    assert_eq!(backend.releases(), vec!["interpreter", "delegate", "model"]);
}

// ── Creation failures ──────────────────────────────────────────

#[test]
fn test_both_interpreter_attempts_fail() {
    let recorder = Recorder::new();
    let backend = ScriptedBackend::new(Script {
        delegated_interpreter_fails: true,
        cpu_interpreter_fails: true,
        ..Default::default()
    });

    let err = RuntimeBuilder::new()
        .callbacks(recorder.callbacks())
        .build(&backend, ModelBytes::from(vec![1u8]))
        .err()
        .unwrap();

    assert!(matches!(err, CreateError::CreateInterpreter(_)));
    assert_eq!(recorder.warnings().len(), 1);
    assert_eq!(backend.releases(), vec!["delegate", "model"]);
}

#[test]
fn test_oversized_shape_rejected_at_load() {
    let model = reference_model(
        vec![TensorInfo::new("x", ElementType::Float32, Shape::new(vec![usize::MAX / 2, 4]))],
        vec![TensorInfo::new("y", ElementType::Float32, Shape::vector(4))],
        vec![],
    );
    let err = RuntimeBuilder::new()
        .use_accelerator(false)
        .callbacks(Recorder::new().callbacks())
        .build(&ReferenceBackend::new(), model)
        .err()
        .unwrap();

    assert!(matches!(err, CreateError::LoadModel(_)));
    assert!(err.to_string().contains("too large"));
}

#[test]
fn test_unreservable_tensor_fails_allocation() {
    let len = 1usize << (usize::BITS - 1);
    let model = reference_model(
        vec![TensorInfo::new("x", ElementType::UInt8, Shape::vector(len))],
        vec![TensorInfo::new("y", ElementType::UInt8, Shape::vector(len))],
        vec![OpSpec::Identity],
    );
    let recorder = Recorder::new();
    let err = RuntimeBuilder::new()
        .use_accelerator(false)
        .callbacks(recorder.callbacks())
        .build(&ReferenceBackend::new(), model)
        .err()
        .unwrap();

    match err {
        CreateError::AllocateTensors(e) => assert_eq!(e.status, Status::Error),
        other => panic!("unexpected error: {other}"),
    }
    assert!(recorder.errors().iter().any(|e| e.contains("failed to allocate")));
}

#[test]
fn test_allocation_failure_carries_status() {
    let backend = ScriptedBackend::new(Script {
        allocate_status: Status::DelegateError,
        ..Default::default()
    });
    let err = RuntimeBuilder::new()
        .callbacks(Recorder::new().callbacks())
        .build(&backend, ModelBytes::from(vec![1u8]))
        .err()
        .unwrap();

    match err {
        CreateError::AllocateTensors(e) => assert_eq!(e.status, Status::DelegateError),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_two_input_model_rejected() {
    let f = |name: &str| TensorInfo::new(name, ElementType::Float32, Shape::vector(2));
    let model = reference_model(vec![f("a"), f("b")], vec![f("y")], vec![]);

    let err = RuntimeBuilder::new()
        .use_accelerator(false)
        .build(&ReferenceBackend::new(), model)
        .err()
        .unwrap();

    assert!(matches!(err, CreateError::TensorArity { inputs: 2, outputs: 1 }));
}

#[test]
fn test_unparseable_model() {
    let err = RuntimeBuilder::new()
        .build(&ReferenceBackend::new(), ModelBytes::from(b"not json".to_vec()))
        .err()
        .unwrap();
    assert!(matches!(err, CreateError::LoadModel(_)));
}

// ── Run failures ───────────────────────────────────────────────

#[test]
fn test_invoke_failure_is_typed_and_recoverable() {
    let recorder = Recorder::new();
    let mut rt = cpu_runtime(vector_model(2, vec![OpSpec::Scale { factor: f32::MAX }]), &recorder);

    let mut output = [0.0; 2];
    let err = rt.run_inference(&mut [10.0, 10.0], &mut output).unwrap_err();
    assert_eq!(err, RunError::Invoke(runtime::InvokeError { status: Status::Error }));

    let errors = recorder.errors();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].starts_with("[engine error] "));
    assert!(errors[0].contains("non-finite"));

    rt.run_inference(&mut [0.0, 0.0], &mut output).unwrap();
    assert_eq!(output, [0.0, 0.0]);
    assert_eq!(rt.metrics().runs, 1);
    assert_eq!(rt.metrics().failures, 1);
}

#[test]
fn test_scripted_invoke_status_is_preserved() {
    let recorder = Recorder::new();
    let backend = ScriptedBackend::new(Script {
        invoke_status: Status::Cancelled,
        ..Default::default()
    });
    let mut rt = RuntimeBuilder::new()
        .callbacks(recorder.callbacks())
        .build(&backend, ModelBytes::from(vec![1u8]))
        .unwrap();

    let err = rt.run_inference(&mut [0.0; 4], &mut [0.0; 4]).unwrap_err();
    assert_eq!(err.to_string(), "failed to invoke interpreter: cancelled");
    assert_eq!(recorder.errors(), vec!["[engine error] scripted invoke failure"]);
}

#[test]
fn test_wrong_input_length_leaves_buffers_untouched() {
    let recorder = Recorder::new();
    let mut rt = cpu_runtime(vector_model(4, vec![]), &recorder);

    let mut input = [1.0, 2.0, 3.0];
    let mut output = [9.0; 4];
    let err = rt.run_inference(&mut input, &mut output).unwrap_err();

    assert_eq!(
        err,
        RunError::LoadInput(LoadInputError::ElementCount(ElementCountMismatch {
            role: TensorRole::Input,
            provided: 3,
            expected: 4,
        }))
    );
    assert_eq!(input, [1.0, 2.0, 3.0]);
    assert_eq!(output, [9.0; 4]);
}

#[test]
fn test_wrong_output_length() {
    let recorder = Recorder::new();
    let mut rt = cpu_runtime(vector_model(4, vec![]), &recorder);

    let mut output = [9.0; 5];
    let err = rt.run_inference(&mut [1.0; 4], &mut output).unwrap_err();
    assert!(matches!(err, RunError::ReadOutput(_)));
    assert!(err.to_string().contains("(5 elements)"));
    assert_eq!(output, [9.0; 5]);
}

#[test]
fn test_failing_input_operator_short_circuits() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut rt = RuntimeBuilder::new()
        .use_accelerator(false)
        .input_operator(FnOperator::new("reject", |_: &mut [f32]| {
            Err(OperatorError::msg("bad frame"))
        }))
        .input_operator(counting_operator(&calls))
        .output_operator(counting_operator(&calls))
        .build(&ReferenceBackend::new(), vector_model(4, vec![]))
        .unwrap();

    let err = rt.run_inference(&mut [0.0; 4], &mut [0.0; 4]).unwrap_err();

    assert!(matches!(
        err,
        RunError::Preprocess(PipelineError { index: 0, .. })
    ));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert_eq!(rt.metrics().failures, 1);
}

#[test]
fn test_failing_output_operator_keeps_partial_output() {
    let mut rt = RuntimeBuilder::new()
        .use_accelerator(false)
        .output_operator(FnOperator::new("double", |v: &mut [f32]| {
            v.iter_mut().for_each(|x| *x *= 2.0);
            Ok(())
        }))
        .output_operator(FnOperator::new("reject", |_: &mut [f32]| {
            Err(OperatorError::msg("no"))
        }))
        .build(&ReferenceBackend::new(), vector_model(3, vec![]))
        .unwrap();

    let mut output = [0.0; 3];
    let err = rt.run_inference(&mut [1.0, 2.0, 3.0], &mut output).unwrap_err();

    match err {
        RunError::Postprocess(e) => {
            assert_eq!(e.index, 1);
            assert_eq!(e.operator, "reject");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(output, [2.0, 4.0, 6.0]);
}
