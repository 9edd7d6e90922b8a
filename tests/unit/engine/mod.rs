use serde_json::json;

use super::*;
use crate::foundation::core::{ImageRef, PoolIndex, Ref};
use crate::step::{GenericPassKind, NamedPass, RenderStep};
use crate::test_support::{
    EventLog, MockFactory, MockNamed, MockWorld, config_json, mock_registry, temp_config,
};

fn engine_for(path: &std::path::Path, log: &EventLog) -> FrameEngine<MockFactory> {
    FrameEngine::new(
        Settings::for_file(path),
        mock_registry(log),
        MockFactory::new(log),
    )
}

fn barrier(image: &str, src: &str, dst: &str) -> serde_json::Value {
    json!({
        "type": "ImageMemoryBarrier",
        "sourceImageLayout": src,
        "targetImageLayout": dst,
        "image": image,
    })
}

#[test]
fn missing_config_yields_empty_pipeline() {
    let log = EventLog::default();
    let path = std::env::temp_dir().join(format!(
        "renderproc_engine_absent_{}.json",
        std::process::id()
    ));
    let mut engine = engine_for(&path, &log);
    let mut world = MockWorld::new(&log);

    let outcome = engine.load_renderer_config(&mut world.uniforms).unwrap();
    assert_eq!(outcome, LoadOutcome::Missing { path });
    assert!(engine.steps().is_empty());
    assert_eq!(engine.config_name(), None);
    assert_eq!(log.position("uniforms load"), None);

    let stats = engine.render_frame(0.016, &mut world.services());
    assert_eq!(stats.steps, 0);
    assert_eq!(log.count("begin_frame"), 1);
    assert_eq!(log.count("end_frame"), 1);
    assert!(!log.snapshot().iter().any(|e| e.starts_with("render ")));
}

#[test]
fn loads_scenario_and_reinits_shadow_once() {
    let log = EventLog::default();
    let path = temp_config(
        "scenario",
        &config_json(
            "Scenario",
            json!([
                { "type": "RenderPassGenericFullscreen", "name": "A" },
                barrier("img1", "ColorAttachment", "ShaderReadOnly"),
                { "type": "RenderPassShadow" },
            ]),
        ),
    );
    let mut engine = engine_for(&path, &log);
    let mut world = MockWorld::new(&log);

    let outcome = engine.load_renderer_config(&mut world.uniforms).unwrap();
    assert_eq!(
        outcome,
        LoadOutcome::Loaded {
            name: "Scenario".to_owned(),
            steps: 3
        }
    );
    assert_eq!(engine.config_name(), Some("Scenario"));
    assert_eq!(log.count("reinit RenderPassShadow"), 1);
    assert_eq!(log.count("uniforms load"), 1);
    assert_eq!(
        engine.dump(),
        "steps: 3\n\
         \x20 #0: RenderPassGenericFullscreen index=0\n\
         \x20 #1: ImageMemoryBarrier image=img1 ColorAttachment -> ShaderReadOnly\n\
         \x20 #2: RenderPassShadow\n"
    );
    std::fs::remove_file(path).ok();
}

#[test]
fn reload_destroys_every_instance_before_creating_new_ones() {
    let log = EventLog::default();
    let first = temp_config(
        "reload_a",
        &config_json(
            "First",
            json!([
                { "type": "RenderPassGenericFullscreen", "name": "A" },
                { "type": "RenderPassGenericMesh", "name": "M" },
                { "type": "RenderPassGenericBlur", "name": "X" },
            ]),
        ),
    );
    let second = temp_config(
        "reload_b",
        &config_json(
            "Second",
            json!([{ "type": "RenderPassGenericFullscreen", "name": "C" }]),
        ),
    );
    let mut engine = engine_for(&first, &log);
    let mut world = MockWorld::new(&log);
    engine.load_renderer_config(&mut world.uniforms).unwrap();
    log.take();

    engine.set_settings(Settings::for_file(&second));
    engine.load_renderer_config(&mut world.uniforms).unwrap();

    let events = log.take();
    let created = events
        .iter()
        .position(|e| e == "create fullscreen")
        .unwrap();
    for destroyed in ["destroy fullscreen A", "destroy mesh M", "destroy blur X"] {
        let at = events.iter().position(|e| e == destroyed).unwrap();
        assert!(at < created, "{destroyed} after create: {events:?}");
    }
    assert_eq!(engine.pools().len(GenericPassKind::Fullscreen), 1);
    assert_eq!(engine.pools().len(GenericPassKind::Mesh), 0);
    assert_eq!(engine.pools().len(GenericPassKind::Blur), 0);
    assert_eq!(engine.pools().fullscreen()[0].name(), "C");

    std::fs::remove_file(first).ok();
    std::fs::remove_file(second).ok();
}

#[test]
fn reloading_same_config_is_idempotent() {
    let log = EventLog::default();
    let path = temp_config(
        "idempotent",
        &config_json(
            "Same",
            json!([
                { "type": "RenderPassGenericMesh", "name": "M" },
                barrier("hdr", "ColorAttachment", "ShaderReadOnly"),
                { "type": "RenderPassBloom" },
            ]),
        ),
    );
    let mut engine = engine_for(&path, &log);
    let mut world = MockWorld::new(&log);

    engine.load_renderer_config(&mut world.uniforms).unwrap();
    let first_dump = engine.dump();
    let first_steps = engine.steps().clone();
    engine.load_renderer_config(&mut world.uniforms).unwrap();

    assert_eq!(engine.dump(), first_dump);
    assert_eq!(*engine.steps(), first_steps);
    assert_eq!(engine.pools().len(GenericPassKind::Mesh), 1);
    assert_eq!(log.count("destroy mesh M"), 1);
    std::fs::remove_file(path).ok();
}

#[test]
fn frame_runs_fixed_pipeline_then_steps_in_order() {
    let log = EventLog::default();
    let path = temp_config(
        "pipeline",
        &config_json(
            "Pipeline",
            json!([
                { "type": "RenderPassGenericFullscreen", "name": "A" },
                barrier("img1", "ColorAttachment", "ShaderReadOnly"),
                { "type": "RenderPassShadow" },
                { "type": "RenderPassGenericMesh", "name": "M" },
            ]),
        ),
    );
    let mut engine = engine_for(&path, &log);
    let mut world = MockWorld::new(&log).with_image("img1", ImageRef(3));
    engine.load_renderer_config(&mut world.uniforms).unwrap();
    log.take();

    engine.render_frame(0.016, &mut world.services());

    assert_eq!(
        log.take(),
        [
            "resize_swap_chain",
            "begin_frame",
            "update_camera_frustums",
            "prepare_frustums",
            "prepare_frustums_for_rendering",
            "reset_allocator",
            "per_frame_uniforms camera=7",
            "update_uniform_buffers",
            "cull [7,10,11]",
            "collect 3",
            "update_per_instance_data 0",
            "render fullscreen A",
            "barrier image#3 ColorAttachment->ShaderReadOnly",
            "render RenderPassShadow",
            "shadow sees 3 frustums",
            "render mesh M",
            "end_frame",
        ]
    );
    assert_eq!(
        engine.active_frustums(),
        [FrustumRef(7), FrustumRef(10), FrustumRef(11)]
    );
    std::fs::remove_file(path).ok();
}

#[test]
fn visibility_is_cleared_between_frames() {
    let log = EventLog::default();
    let path = temp_config("stats", &config_json("Stats", json!([])));
    let mut engine = engine_for(&path, &log);
    let mut world = MockWorld::new(&log);
    world.scene.objects = vec![(0, 0, Ref(1)), (0, 1, Ref(2)), (2, 0, Ref(3))];
    engine.load_renderer_config(&mut world.uniforms).unwrap();

    let first = engine.render_frame(0.016, &mut world.services());
    let second = engine.render_frame(0.016, &mut world.services());

    assert_eq!(first.frame, FrameIndex(0));
    assert_eq!(second.frame, FrameIndex(1));
    assert_eq!(engine.frame_index(), FrameIndex(2));
    for stats in [first, second] {
        assert_eq!(stats.frustums, 3);
        assert_eq!(stats.draw_calls, 3);
        assert_eq!(stats.mesh_components, 3);
        assert_eq!(stats.dropped, 0);
    }
    assert_eq!(engine.visibility().draw_calls(0, 1), vec![Ref(2)]);
    assert_eq!(engine.visibility().mesh_components(2), vec![Ref(3)]);
    std::fs::remove_file(path).ok();
}

#[test]
fn excess_frustums_are_not_culled() {
    let log = EventLog::default();
    let path = temp_config("frustum_cap", &config_json("Cap", json!([])));
    let limits = VisibilityLimits {
        max_frustums_per_frame: 2,
        ..VisibilityLimits::default()
    };
    let mut engine = FrameEngine::with_limits(
        Settings::for_file(&path),
        mock_registry(&log),
        MockFactory::new(&log),
        limits,
    );
    let mut world = MockWorld::new(&log);
    engine.load_renderer_config(&mut world.uniforms).unwrap();

    let stats = engine.render_frame(0.016, &mut world.services());
    assert_eq!(stats.frustums, 2);
    assert_eq!(log.count("cull [7,10]"), 1);
    std::fs::remove_file(path).ok();
}

#[test]
fn failed_reload_leaves_empty_pipeline() {
    let log = EventLog::default();
    let good = temp_config(
        "good",
        &config_json(
            "Good",
            json!([{ "type": "RenderPassGenericFullscreen", "name": "A" }]),
        ),
    );
    let bad = temp_config(
        "bad",
        &config_json(
            "Bad",
            json!([
                { "type": "RenderPassGenericFullscreen", "name": "B" },
                { "type": "RenderPassGenericMesh", "name": "N" },
                { "type": "RenderPassNope" },
            ]),
        ),
    );
    let mut engine = engine_for(&good, &log);
    let mut world = MockWorld::new(&log);
    engine.load_renderer_config(&mut world.uniforms).unwrap();

    engine.set_settings(Settings::for_file(&bad));
    let err = engine.load_renderer_config(&mut world.uniforms).unwrap_err();

    assert!(matches!(err, RenderProcError::Config(_)));
    assert!(err.to_string().contains("#2 ('RenderPassNope')"), "{err}");
    assert!(engine.steps().is_empty());
    assert!(engine.pools().is_empty());
    assert_eq!(engine.config_name(), None);
    assert_eq!(log.count("destroy fullscreen A"), 1);
    assert_eq!(log.count("destroy fullscreen B"), 1);
    assert_eq!(log.count("destroy mesh N"), 1);

    let stats = engine.render_frame(0.016, &mut world.services());
    assert_eq!(stats.steps, 0);
    std::fs::remove_file(good).ok();
    std::fs::remove_file(bad).ok();
}

#[test]
fn rejected_uniform_buffers_abort_load() {
    let log = EventLog::default();
    let config = RendererConfig::from_json_str(&config_json(
        "Uniforms",
        json!([{ "type": "RenderPassShadow" }]),
    ))
    .unwrap();
    let path = std::env::temp_dir().join("renderproc_unused.json");
    let mut engine = engine_for(&path, &log);
    let mut world = MockWorld::new(&log);
    world.uniforms.reject = true;

    let err = engine.load_document(&config, &mut world.uniforms).unwrap_err();
    assert!(matches!(err, RenderProcError::Collaborator(_)), "{err}");
    assert!(engine.steps().is_empty());
    assert_eq!(log.count("reinit RenderPassShadow"), 0);
}

#[test]
fn malformed_document_is_a_serde_error() {
    let log = EventLog::default();
    let path = temp_config("malformed", r#"{ "name": "Broken", "renderSteps": [ }"#);
    let mut engine = engine_for(&path, &log);
    let mut world = MockWorld::new(&log);

    let err = engine.load_renderer_config(&mut world.uniforms).unwrap_err();
    assert!(matches!(err, RenderProcError::Serde(_)), "{err}");
    assert!(engine.steps().is_empty());
    std::fs::remove_file(path).ok();
}

#[test]
fn dropping_engine_destroys_pool_instances() {
    let log = EventLog::default();
    let path = temp_config(
        "drop",
        &config_json(
            "Drop",
            json!([{ "type": "RenderPassGenericBlur", "name": "X" }]),
        ),
    );
    let mut engine = engine_for(&path, &log);
    let mut world = MockWorld::new(&log);
    engine.load_renderer_config(&mut world.uniforms).unwrap();

    drop(engine);
    assert_eq!(log.count("destroy blur X"), 1);
    std::fs::remove_file(path).ok();
}

#[test]
#[should_panic(expected = "no RenderPassGenericMesh instance at pool index 3")]
fn dangling_pool_index_halts_the_frame() {
    let log = EventLog::default();
    let path = temp_config("dangling", &config_json("Dangling", json!([])));
    let mut engine = engine_for(&path, &log);
    let mut world = MockWorld::new(&log);
    engine.load_renderer_config(&mut world.uniforms).unwrap();
    std::fs::remove_file(path).ok();

    engine
        .steps
        .push(RenderStep::generic(GenericPassKind::Mesh, PoolIndex(3)));
    engine.render_frame(0.016, &mut world.services());
}

#[test]
#[should_panic(expected = "does not resolve")]
fn unresolvable_barrier_image_halts_the_frame() {
    let log = EventLog::default();
    let path = temp_config(
        "unresolved",
        &config_json(
            "Unresolved",
            json!([barrier("gbuffer", "ColorAttachment", "ShaderReadOnly")]),
        ),
    );
    let mut engine = engine_for(&path, &log);
    let mut world = MockWorld::new(&log);
    engine.load_renderer_config(&mut world.uniforms).unwrap();
    std::fs::remove_file(path).ok();

    engine.render_frame(0.016, &mut world.services());
}

#[test]
#[should_panic(expected = "RenderPassBloom is not registered")]
fn named_pass_removed_after_load_halts_the_frame() {
    let log = EventLog::default();
    let path = temp_config(
        "unregistered",
        &config_json("Unregistered", json!([{ "type": "RenderPassBloom" }])),
    );
    let mut engine = engine_for(&path, &log);
    let mut world = MockWorld::new(&log);
    engine.load_renderer_config(&mut world.uniforms).unwrap();
    std::fs::remove_file(path).ok();

    engine.registry = PassRegistry::new();
    engine.render_frame(0.016, &mut world.services());
}

#[test]
fn registry_is_reachable_for_host_overrides() {
    let log = EventLog::default();
    let path = std::env::temp_dir().join("renderproc_registry_unused.json");
    let mut engine = engine_for(&path, &log);
    assert!(engine.registry().is_registered(NamedPass::Lighting));
    let replaced = engine.registry_mut().register(
        NamedPass::Lighting,
        Box::new(MockNamed::new(NamedPass::Lighting, &log)),
    );
    assert!(replaced.is_some());
    assert_eq!(engine.registry().registered().count(), NamedPass::COUNT);
}
