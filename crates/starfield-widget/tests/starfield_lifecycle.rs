mod common;

use std::time::Duration;

use glam::Vec3;
use rand::SeedableRng;
use rand::rngs::StdRng;
use starfield_engine::coords::Viewport;
use starfield_widget::assets::ShaderAsset;
use starfield_widget::backend::DrawCmd;
use starfield_widget::error::BufferKind;
use starfield_widget::particles::{FAR_Z, NEAR_Z};
use starfield_widget::{Phase, Starfield, StarfieldConfig};

use common::{FakeBackend, Submitted};

fn config(star_count: usize) -> StarfieldConfig {
    StarfieldConfig {
        star_count,
        seed: Some(11),
        ..StarfieldConfig::default()
    }
}

fn starfield(star_count: usize) -> Starfield<FakeBackend> {
    Starfield::from_config(config(star_count))
}

fn running(star_count: usize) -> (Starfield<FakeBackend>, FakeBackend) {
    let mut backend = FakeBackend::new();
    let mut s = starfield(star_count);
    s.initialize(&mut backend);
    (s, backend)
}

const BROKEN_FRAGMENT: &str = "@fragment fn fs_main() -> @location(0) vec4<f32> { return oops; }";
const BROKEN_VERTEX: &str = "@vertex fn vs_main(@location(0) vPosition: vec4<f32>) -> @builtin(position) vec4<f32> { return vPosition +; }";
const UINT_COLOR_FRAGMENT: &str = "@fragment fn fs_main(@location(0) brightness: f32) -> @location(0) vec4<u32> { return vec4<u32>(u32(brightness)); }";

// ── initialization ───────────────────────────────────────────────────────

#[test]
fn initialize_builds_program_and_buffers() {
    let (s, backend) = running(16);
    assert_eq!(s.phase(), Phase::Running);
    assert!(s.shader_ok());
    assert!(s.vbo_ok());
    assert_eq!(backend.live(), (2, 1, 2));
    assert_eq!(s.mesh().map(|m| m.vertex_count()), Some(4));
}

#[test]
fn initialize_scatters_every_star() {
    let (s, _backend) = running(200);
    for p in s.particles().positions() {
        let r = (p.x * p.x + p.y * p.y).sqrt();
        assert!((0.999..3.001).contains(&r), "radius {r}");
        assert!((NEAR_Z..FAR_Z).contains(&p.z), "z {}", p.z);
    }
}

#[test]
fn tick_before_initialize_is_ignored() {
    let mut s = starfield(8);
    assert_eq!(s.tick(Duration::from_millis(10_000)), 0);
    assert!(s.particles().positions().iter().all(|p| *p == Vec3::ZERO));
    assert!(s.frame().is_clear_only());
}

#[test]
fn second_initialize_is_ignored() {
    let (mut s, mut backend) = running(4);
    s.initialize(&mut backend);
    assert_eq!(backend.counters.programs_created.get(), 1);
}

// ── rebuild ──────────────────────────────────────────────────────────────

#[test]
fn rebuild_replaces_device_objects_without_leaking() {
    let (mut s, mut backend) = running(4);
    s.rebuild(&mut backend);
    s.rebuild(&mut backend);

    assert_eq!(backend.live(), (2, 1, 2));
    assert_eq!(backend.counters.programs_created.get(), 3);
    assert_eq!(backend.counters.buffers_created.get(), 6);
    assert!(s.shader_ok());
    assert!(s.vbo_ok());
}

#[test]
fn rebuild_keeps_star_positions() {
    let (mut s, mut backend) = running(32);
    let before = s.particles().positions().to_vec();
    s.rebuild(&mut backend);
    assert_eq!(s.particles().positions(), before.as_slice());
}

// ── failures ─────────────────────────────────────────────────────────────

#[test]
fn broken_fragment_shader_leaves_clear_only_frames() {
    let mut cfg = config(10);
    cfg.fragment_shader = ShaderAsset::Builtin {
        name: "broken.wgsl",
        source: BROKEN_FRAGMENT,
    };
    let mut backend = FakeBackend::new();
    let mut s: Starfield<FakeBackend> = Starfield::from_config(cfg);
    s.initialize(&mut backend);

    assert_eq!(s.phase(), Phase::Running);
    assert!(!s.shader_ok());
    assert!(s.vbo_ok());
    // The vertex stage created before the failure was released again.
    assert_eq!(backend.live(), (0, 0, 2));
    assert!(s.frame().is_clear_only());
}

#[test]
fn broken_vertex_shader_leaves_clear_only_frames() {
    let mut cfg = config(10);
    cfg.vertex_shader = ShaderAsset::Builtin {
        name: "broken.wgsl",
        source: BROKEN_VERTEX,
    };
    let mut backend = FakeBackend::new();
    let mut s: Starfield<FakeBackend> = Starfield::from_config(cfg);
    s.initialize(&mut backend);

    assert_eq!(s.phase(), Phase::Running);
    assert!(!s.shader_ok());
    assert!(s.vbo_ok());
    assert_eq!(backend.counters.stages_created.get(), 0);
    assert_eq!(backend.live(), (0, 0, 2));
    assert!(s.frame().is_clear_only());
}

#[test]
fn integer_color_output_fails_to_link_without_stopping_the_widget() {
    let mut cfg = config(10);
    cfg.fragment_shader = ShaderAsset::Builtin {
        name: "uint_color.wgsl",
        source: UINT_COLOR_FRAGMENT,
    };
    let mut backend = FakeBackend::new();
    let mut s: Starfield<FakeBackend> = Starfield::from_config(cfg);
    s.initialize(&mut backend);

    assert_eq!(s.phase(), Phase::Running);
    assert!(!s.shader_ok());
    // Both stages compiled; linking rejected them before any program existed.
    assert_eq!(backend.counters.stages_created.get(), 2);
    assert_eq!(backend.counters.programs_created.get(), 0);
    assert_eq!(backend.live(), (0, 0, 2));

    s.resize(64, 64);
    assert!(s.frame().is_clear_only());

    // The field keeps drifting even though nothing is drawn.
    let before = s.particles().positions().to_vec();
    s.tick(Duration::from_millis(10_000));
    assert_ne!(s.particles().positions(), before.as_slice());
}

#[test]
fn missing_shader_file_is_reported_not_fatal() {
    let mut cfg = config(10);
    cfg.vertex_shader = ShaderAsset::File("/nonexistent/starfield/vshader.wgsl".into());
    let mut backend = FakeBackend::new();
    let mut s: Starfield<FakeBackend> = Starfield::from_config(cfg);
    s.initialize(&mut backend);

    assert!(!s.shader_ok());
    assert_eq!(backend.counters.stages_created.get(), 0);
}

#[test]
fn failed_rebuild_drops_the_previous_program() {
    let (mut s, mut backend) = running(4);
    assert!(s.shader_ok());

    s.set_shader_assets(
        ShaderAsset::builtin_vertex(),
        ShaderAsset::Builtin {
            name: "broken.wgsl",
            source: BROKEN_FRAGMENT,
        },
    );
    s.rebuild(&mut backend);

    assert!(!s.shader_ok());
    assert!(s.vbo_ok());
    assert_eq!(backend.live(), (0, 0, 2));

    s.set_shader_assets(ShaderAsset::builtin_vertex(), ShaderAsset::builtin_fragment());
    assert!(s.rebuild_shaders(&mut backend));
    assert_eq!(backend.live(), (2, 1, 2));
}

#[test]
fn upload_before_mesh_leaves_buffers_invalid() {
    let mut backend = FakeBackend::new();
    let mut s = starfield(4);
    assert!(!s.upload_buffers(&mut backend));
    assert!(!s.vbo_ok());
    assert_eq!(backend.counters.buffers_created.get(), 0);
}

#[test]
fn failed_index_upload_releases_vertex_buffer() {
    let mut backend = FakeBackend::failing_buffer(BufferKind::Index);
    let mut s = starfield(4);
    s.initialize(&mut backend);

    assert!(s.shader_ok());
    assert!(!s.vbo_ok());
    assert_eq!(backend.counters.buffers.get(), 0);
    assert!(s.frame().is_clear_only());
}

// ── teardown ─────────────────────────────────────────────────────────────

#[test]
fn teardown_is_idempotent() {
    let (mut s, backend) = running(4);
    s.teardown();
    s.teardown();

    assert_eq!(s.phase(), Phase::TornDown);
    assert!(!s.shader_ok());
    assert!(!s.vbo_ok());
    assert_eq!(backend.live(), (0, 0, 0));
}

#[test]
fn torn_down_widget_ignores_ticks_and_rebuilds() {
    let (mut s, mut backend) = running(4);
    s.teardown();
    let before = s.particles().positions().to_vec();

    assert_eq!(s.tick(Duration::from_secs(60)), 0);
    s.rebuild(&mut backend);

    assert_eq!(s.particles().positions(), before.as_slice());
    assert_eq!(backend.live(), (0, 0, 0));
    assert!(s.frame().is_clear_only());
}

// ── drift ────────────────────────────────────────────────────────────────

#[test]
fn ten_ticks_advance_or_wrap_every_star() {
    let (mut s, _backend) = running(5000);

    for _ in 0..10 {
        let before = s.particles().positions().to_vec();
        s.tick(Duration::from_millis(10_000));

        for (old, new) in before.iter().zip(s.particles().positions()) {
            let expected = old.z + 0.2;
            if expected >= FAR_Z {
                assert_eq!(new.z, NEAR_Z);
                let r = (new.x * new.x + new.y * new.y).sqrt();
                assert!((0.999..3.001).contains(&r), "radius {r}");
            } else {
                assert!((new.z - expected).abs() < 1e-5);
                assert_eq!((new.x, new.y), (old.x, old.y));
            }
        }
    }
    assert_eq!(s.particles().len(), 5000);
}

#[test]
fn star_near_the_far_plane_respawns() {
    let (mut s, _backend) = running(1);
    s.particles_mut().set_position(0, Vec3::new(1.5, 0.0, 0.95));

    assert_eq!(s.tick(Duration::from_millis(10_000)), 1);

    let p = s.particles().positions()[0];
    assert_eq!(p.z, -1.0);
    let r = (p.x * p.x + p.y * p.y).sqrt();
    assert!((0.999..3.001).contains(&r));
}

#[test]
fn sub_millisecond_ticks_do_not_move_stars() {
    let (mut s, _backend) = running(16);
    let before = s.particles().positions().to_vec();
    s.tick(Duration::from_micros(900));
    assert_eq!(s.particles().positions(), before.as_slice());
}

// ── frames ───────────────────────────────────────────────────────────────

#[test]
fn frame_draws_one_quad_per_star() {
    let (mut s, _backend) = running(5000);
    s.resize(800, 600);

    let frame = s.frame();
    assert_eq!(frame.viewport, Viewport::new(800, 600));
    assert_eq!(frame.draw_count(), 5000);

    let translations: Vec<_> = frame.translations().collect();
    for (t, p) in translations.iter().zip(s.particles().positions()) {
        assert_eq!(*t, p.extend(0.0));
    }
    assert_eq!(translations.len(), 5000);
}

#[test]
fn frame_binds_then_releases_in_order() {
    let (s, _backend) = running(2);
    let frame = s.frame();
    let cmds = &frame.commands;

    assert!(matches!(cmds[0], DrawCmd::BindProgram(_)));
    match &cmds[1] {
        DrawCmd::BindVertexBuffer { attribute, .. } => {
            assert_eq!(attribute.location, 0);
            assert_eq!(attribute.components, 4);
            assert_eq!(attribute.offset, 0);
            assert_eq!(attribute.effective_stride(), 16);
        }
        _ => panic!("expected vertex buffer bind"),
    }
    assert!(matches!(cmds[2], DrawCmd::BindIndexBuffer(_)));
    assert!(matches!(cmds[3], DrawCmd::SetTranslation(_)));
    assert!(matches!(cmds[4], DrawCmd::DrawIndexed { index_count: 6 }));

    let n = cmds.len();
    assert!(matches!(cmds[n - 3], DrawCmd::ReleaseIndexBuffer));
    assert!(matches!(cmds[n - 2], DrawCmd::ReleaseVertexBuffer));
    assert!(matches!(cmds[n - 1], DrawCmd::ReleaseProgram));
}

#[test]
fn draw_submits_to_the_target() {
    let (mut s, mut backend) = running(3);
    s.resize(320, 200);

    let mut target: Vec<Submitted> = Vec::new();
    s.draw(&mut backend, &mut target);
    s.tick(Duration::from_millis(16));
    s.draw(&mut backend, &mut target);

    assert_eq!(target.len(), 2);
    assert_eq!(target[0].viewport, Viewport::new(320, 200));
    assert_eq!(target[0].draws, 3);
    assert_ne!(target[0].translations, target[1].translations);
}

#[test]
fn empty_field_still_clears() {
    let (s, _backend) = running(0);
    let frame = s.frame();
    assert_eq!(frame.draw_count(), 0);
}

#[test]
fn injected_rng_drives_the_scatter() {
    let mut a: Starfield<FakeBackend, StdRng> = Starfield::new(config(8), StdRng::seed_from_u64(5));
    let mut b: Starfield<FakeBackend, StdRng> = Starfield::new(config(8), StdRng::seed_from_u64(5));
    let mut backend = FakeBackend::new();
    a.initialize(&mut backend);
    b.initialize(&mut backend);
    assert_eq!(a.particles().positions(), b.particles().positions());
}
