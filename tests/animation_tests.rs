//! Animation System Tests
//!
//! Tests for:
//! - BoneAnimation sampling, clamping and keyframe validation
//! - Shortest-arc quaternion blending
//! - AnimationClip time ranges across tracks
//! - Skeleton hierarchy composition and palette layouts
//! - SkinningPalette packing

use std::f32::consts::{FRAC_PI_2, PI};

use glam::{Mat4, Quat, Vec3};

use sinew::animation::values::Interpolatable;
use sinew::{
    AnimationClip, AnimationError, BoneAnimation, Keyframe, MAX_PALETTE_BONES, PaletteLayout, PoseScratch,
    Skeleton, SkinningPalette,
};

const EPSILON: f32 = 1e-5;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn approx_mat(a: Mat4, b: Mat4) -> bool {
    a.abs_diff_eq(b, EPSILON)
}

fn key_at(time: f32, translation: Vec3) -> Keyframe {
    Keyframe::new(time, translation, Vec3::ONE, Quat::IDENTITY)
}

fn still_track(translation: Vec3) -> BoneAnimation {
    BoneAnimation::constant(key_at(0.0, translation))
}

// ============================================================================
// BoneAnimation: Sampling
// ============================================================================

#[test]
fn track_clamps_before_first_keyframe() {
    let track = BoneAnimation::new(vec![key_at(1.0, Vec3::X), key_at(3.0, Vec3::Y)]).unwrap();

    let pose = track.sample(0.0);
    assert_eq!(pose.translation, Vec3::X);
    assert!(approx_mat(track.interpolate(-10.0), Mat4::from_translation(Vec3::X)));
}

#[test]
fn track_clamps_after_last_keyframe() {
    let track = BoneAnimation::new(vec![key_at(1.0, Vec3::X), key_at(3.0, Vec3::Y)]).unwrap();

    assert_eq!(track.sample(3.0).translation, Vec3::Y);
    assert_eq!(track.sample(100.0).translation, Vec3::Y);
}

#[test]
fn track_linear_midpoint() {
    let track = BoneAnimation::new(vec![
        Keyframe::new(0.0, Vec3::ZERO, Vec3::ONE, Quat::IDENTITY),
        Keyframe::new(2.0, Vec3::new(4.0, 0.0, 0.0), Vec3::splat(3.0), Quat::IDENTITY),
    ])
    .unwrap();

    let pose = track.sample(0.5);
    assert!(approx(pose.translation.x, 1.0), "Expected 1.0, got {}", pose.translation.x);
    assert!(approx(pose.scale.y, 1.5), "Expected 1.5, got {}", pose.scale.y);
}

#[test]
fn track_reproduces_exact_keyframes() {
    let keys = vec![
        Keyframe::new(0.0, Vec3::ZERO, Vec3::ONE, Quat::IDENTITY),
        Keyframe::new(0.5, Vec3::new(1.0, 2.0, 3.0), Vec3::splat(2.0), Quat::from_rotation_x(FRAC_PI_2)),
        Keyframe::new(1.5, Vec3::new(-1.0, 0.0, 0.0), Vec3::ONE, Quat::from_rotation_y(PI / 3.0)),
    ];
    let track = BoneAnimation::new(keys.clone()).unwrap();

    for key in &keys {
        assert!(
            approx_mat(track.interpolate(key.time), key.to_matrix()),
            "Keyframe at {} not reproduced",
            key.time
        );
    }
}

#[test]
fn single_keyframe_track_is_constant() {
    let track = still_track(Vec3::Z);
    assert_eq!(track.start_time(), 0.0);
    assert_eq!(track.end_time(), 0.0);
    assert_eq!(track.sample(42.0).translation, Vec3::Z);
}

#[test]
fn track_rejects_empty_keyframes() {
    assert_eq!(BoneAnimation::new(vec![]).unwrap_err(), AnimationError::EmptyTrack);
}

#[test]
fn track_rejects_non_increasing_times() {
    let err = BoneAnimation::new(vec![key_at(0.0, Vec3::ZERO), key_at(1.0, Vec3::ZERO), key_at(1.0, Vec3::ZERO)])
        .unwrap_err();
    assert!(
        matches!(err, AnimationError::NonIncreasingKeyframes { index: 2, .. }),
        "unexpected error: {err}"
    );
}

// ============================================================================
// Quaternion Blending
// ============================================================================

#[test]
fn slerp_takes_shortest_arc() {
    let start = Quat::IDENTITY;
    // same orientation as a +90 degree turn, stored in the opposite hemisphere
    let end = -Quat::from_rotation_z(FRAC_PI_2);

    let mut previous = 0.0;
    for step in 1..=10 {
        let t = step as f32 / 10.0;
        let angle = start.angle_between(Quat::interpolate_linear(start, end, t));
        assert!(angle >= previous - EPSILON, "Angle went backwards at t={t}");
        assert!(angle <= FRAC_PI_2 + EPSILON, "Took the long arc at t={t}: {angle}");
        previous = angle;
    }
    assert!(approx(previous, FRAC_PI_2));
}

#[test]
fn slerp_midpoint_is_half_angle() {
    let end = Quat::from_rotation_y(FRAC_PI_2);
    let mid = sinew::animation::shortest_arc_slerp(Quat::IDENTITY, end, 0.5);
    assert!(mid.abs_diff_eq(Quat::from_rotation_y(FRAC_PI_2 / 2.0), EPSILON));
}

// ============================================================================
// AnimationClip: Time Range
// ============================================================================

#[test]
fn clip_range_is_union_of_tracks() {
    let clip = AnimationClip::new(
        "Walk",
        vec![
            BoneAnimation::new(vec![key_at(0.0, Vec3::ZERO), key_at(2.0, Vec3::ZERO)]).unwrap(),
            BoneAnimation::new(vec![key_at(1.0, Vec3::ZERO), key_at(5.0, Vec3::ZERO)]).unwrap(),
        ],
    );

    assert_eq!(clip.time_range(), (0.0, 5.0));
    assert_eq!(clip.start_time(), 0.0);
    assert_eq!(clip.end_time(), 5.0);
    assert!(approx(clip.duration(), 5.0));
}

#[test]
fn empty_clip_spans_nothing() {
    let clip = AnimationClip::new("Empty", vec![]);
    assert_eq!(clip.time_range(), (0.0, 0.0));
    assert_eq!(clip.duration(), 0.0);
}

#[test]
fn clip_interpolate_checks_buffer_length() {
    let clip = AnimationClip::new("Idle", vec![still_track(Vec3::ZERO), still_track(Vec3::ZERO)]);
    let mut out = vec![Mat4::IDENTITY; 3];

    let err = clip.interpolate_into(0.0, &mut out).unwrap_err();
    assert_eq!(err, AnimationError::BufferSizeMismatch { expected: 2, actual: 3 });
}

// ============================================================================
// Skeleton: Hierarchy Composition
// ============================================================================

fn chain_skeleton(translation: Vec3) -> Skeleton {
    let clip = AnimationClip::new("Chain", (0..3).map(|_| still_track(translation)).collect());
    Skeleton::new(vec![-1, 0, 1], vec![Mat4::IDENTITY; 3], [clip]).unwrap()
}

#[test]
fn identity_chain_stays_identity() {
    let skeleton = chain_skeleton(Vec3::ZERO);
    let mut scratch = PoseScratch::default();
    let mut out = Vec::new();

    skeleton
        .evaluate_into("Chain", 0.0, PaletteLayout::default(), &mut scratch, &mut out)
        .unwrap();

    assert_eq!(out.len(), 3);
    for (bone, (to_root, skin)) in scratch.to_root().iter().zip(&out).enumerate() {
        assert!(approx_mat(*to_root, Mat4::IDENTITY), "to_root[{bone}] is not identity");
        assert!(approx_mat(*skin, Mat4::IDENTITY), "final[{bone}] is not identity");
    }
}

#[test]
fn translation_chain_accumulates_down_the_hierarchy() {
    let skeleton = chain_skeleton(Vec3::X);
    let out = skeleton.evaluate_with("Chain", 0.0, PaletteLayout::ColumnMajor).unwrap();

    for (bone, skin) in out.iter().enumerate() {
        let expected = (bone + 1) as f32;
        assert!(
            approx(skin.w_axis.x, expected),
            "Bone {bone}: expected x={expected}, got {}",
            skin.w_axis.x
        );
    }
}

#[test]
fn bone_offset_is_applied_before_the_pose() {
    let clip = AnimationClip::new("Lift", vec![still_track(Vec3::Y)]);
    let offset = Mat4::from_translation(Vec3::new(0.0, -1.0, 0.0));
    let skeleton = Skeleton::new(vec![-1], vec![offset], [clip]).unwrap();

    let out = skeleton.evaluate_with("Lift", 0.0, PaletteLayout::ColumnMajor).unwrap();
    assert!(approx_mat(out[0], Mat4::IDENTITY));
}

#[test]
fn transposed_layout_is_transpose_of_column_major() {
    let clip = AnimationClip::new(
        "Twist",
        vec![
            BoneAnimation::constant(Keyframe::new(0.0, Vec3::X, Vec3::ONE, Quat::from_rotation_z(0.3))),
            BoneAnimation::constant(Keyframe::new(0.0, Vec3::Y, Vec3::splat(2.0), Quat::from_rotation_x(1.1))),
        ],
    );
    let skeleton = Skeleton::new(vec![-1, 0], vec![Mat4::IDENTITY; 2], [clip]).unwrap();

    let column_major = skeleton.evaluate_with("Twist", 0.0, PaletteLayout::ColumnMajor).unwrap();
    let transposed = skeleton.evaluate("Twist", 0.0).unwrap();

    for (a, b) in column_major.iter().zip(&transposed) {
        assert!(approx_mat(a.transpose(), *b));
    }
}

#[test]
fn unknown_clip_is_reported() {
    let skeleton = chain_skeleton(Vec3::ZERO);
    let err = skeleton.evaluate("Run", 0.0).unwrap_err();
    assert_eq!(err, AnimationError::UnknownClip("Run".to_string()));
}

// ============================================================================
// SkinningPalette
// ============================================================================

#[test]
fn palette_packs_transforms_and_pads_with_identity() {
    let skin = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
    let palette = SkinningPalette::from_transforms(&[skin]).unwrap();

    assert_eq!(palette.bone_transforms[0], skin.to_cols_array());
    assert_eq!(palette.bone_transforms[1], Mat4::IDENTITY.to_cols_array());
    assert_eq!(palette.as_bytes().len(), MAX_PALETTE_BONES * 64);

    let floats: &[f32] = bytemuck::cast_slice(palette.as_bytes());
    assert_eq!(floats[12..15], [1.0_f32, 2.0, 3.0]);
}

#[test]
fn palette_rejects_too_many_bones() {
    let transforms = vec![Mat4::IDENTITY; MAX_PALETTE_BONES + 1];
    let err = SkinningPalette::from_transforms(&transforms).unwrap_err();
    assert_eq!(
        err,
        AnimationError::PaletteOverflow {
            bones: MAX_PALETTE_BONES + 1,
            max: MAX_PALETTE_BONES
        }
    );
}
