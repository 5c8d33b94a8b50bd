//! WGSL for the dot field and the base sphere, plus a CPU mirror of the dot
//! shader math so the animation contract can be checked without a GPU.
//!
//! Dot vertex: the local disc position is scaled by `max_extrusion`. Above
//! 1.0 every component also gets `sin(time + offset) * 0.05` added, which
//! makes pressed dots wobble. Dot fragment: two teal tones mixed by
//! `|sin(time + offset)|` plus a cubic fresnel rim.

/// Wobble amplitude while extruded.
pub const WOBBLE_AMPLITUDE: f32 = 0.05;
pub const DOT_COLOR_A: [f32; 3] = [0.11, 0.28, 0.32];
pub const DOT_COLOR_B: [f32; 3] = [0.18, 0.42, 0.45];
pub const RIM_COLOR: [f32; 3] = [0.5, 0.8, 0.8];
pub const RIM_STRENGTH: f32 = 0.4;
pub const FRESNEL_POWER: f32 = 3.0;

/// Per-frame uniforms shared by both pipelines. Laid out for a uniform
/// buffer (16-byte rows).
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Globals {
    pub view_proj: [[f32; 4]; 4],
    /// World-space eye position; w unused.
    pub camera_pos: [f32; 4],
    /// Base sphere rgb and opacity.
    pub base_color: [f32; 4],
    /// xyz position, w range.
    pub point_light_pos: [f32; 4],
    /// rgb color, w intensity.
    pub point_light_color: [f32; 4],
    /// rgb sky color, w intensity.
    pub sky_color: [f32; 4],
    pub ground_color: [f32; 4],
    pub time: f32,
    pub max_extrusion: f32,
    pub _pad: [f32; 2],
}

pub const DOT_SHADER: &str = r#"
struct Globals {
    view_proj: mat4x4<f32>,
    camera_pos: vec4<f32>,
    base_color: vec4<f32>,
    point_light_pos: vec4<f32>,
    point_light_color: vec4<f32>,
    sky_color: vec4<f32>,
    ground_color: vec4<f32>,
    time: f32,
    max_extrusion: f32,
    _pad: vec2<f32>,
};

@group(0) @binding(0)
var<uniform> globals: Globals;

struct VsIn {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) m0: vec4<f32>,
    @location(3) m1: vec4<f32>,
    @location(4) m2: vec4<f32>,
    @location(5) m3: vec4<f32>,
    @location(6) offset: f32,
};

struct VsOut {
    @builtin(position) pos: vec4<f32>,
    @location(0) normal: vec3<f32>,
    @location(1) view_dir: vec3<f32>,
    @location(2) offset: f32,
};

@vertex
fn vs_main(v: VsIn) -> VsOut {
    let model = mat4x4<f32>(v.m0, v.m1, v.m2, v.m3);
    let t = globals.time + v.offset;

    var p = v.position * globals.max_extrusion;
    if (globals.max_extrusion > 1.0) {
        p = p + vec3<f32>(sin(t) * 0.05);
    }

    let world = model * vec4<f32>(p, 1.0);
    var out: VsOut;
    out.pos = globals.view_proj * world;
    out.normal = (model * vec4<f32>(v.normal, 0.0)).xyz;
    out.view_dir = globals.camera_pos.xyz - world.xyz;
    out.offset = v.offset;
    return out;
}

@fragment
fn fs_main(in: VsOut) -> @location(0) vec4<f32> {
    let t = globals.time + in.offset;
    let color_a = vec3<f32>(0.11, 0.28, 0.32);
    let color_b = vec3<f32>(0.18, 0.42, 0.45);
    let base = mix(color_a, color_b, abs(sin(t)));

    let n = normalize(in.normal);
    let v = normalize(in.view_dir);
    let fresnel = pow(1.0 - max(dot(n, v), 0.0), 3.0);
    let rim = vec3<f32>(0.5, 0.8, 0.8) * fresnel * 0.4;
    return vec4<f32>(base + rim, 1.0);
}
"#;

pub const BASE_SHADER: &str = r#"
struct Globals {
    view_proj: mat4x4<f32>,
    camera_pos: vec4<f32>,
    base_color: vec4<f32>,
    point_light_pos: vec4<f32>,
    point_light_color: vec4<f32>,
    sky_color: vec4<f32>,
    ground_color: vec4<f32>,
    time: f32,
    max_extrusion: f32,
    _pad: vec2<f32>,
};

@group(0) @binding(0)
var<uniform> globals: Globals;

struct VsOut {
    @builtin(position) pos: vec4<f32>,
    @location(0) normal: vec3<f32>,
    @location(1) world: vec3<f32>,
};

@vertex
fn vs_main(@location(0) position: vec3<f32>, @location(1) normal: vec3<f32>) -> VsOut {
    var out: VsOut;
    out.pos = globals.view_proj * vec4<f32>(position, 1.0);
    out.normal = normal;
    out.world = position;
    return out;
}

@fragment
fn fs_main(in: VsOut) -> @location(0) vec4<f32> {
    let n = normalize(in.normal);

    let sky_w = 0.5 * n.y + 0.5;
    let hemi = mix(globals.ground_color.rgb, globals.sky_color.rgb, sky_w) * globals.sky_color.w;

    let to_light = globals.point_light_pos.xyz - in.world;
    let d = length(to_light);
    let range = globals.point_light_pos.w;
    var falloff = 1.0 / max(d * d, 0.01);
    if (range > 0.0) {
        let r = clamp(1.0 - pow(d / range, 4.0), 0.0, 1.0);
        falloff = falloff * r * r;
    }
    let ndotl = max(dot(n, to_light / max(d, 1e-4)), 0.0);
    let point = globals.point_light_color.rgb * globals.point_light_color.w * falloff * ndotl;

    let lit = globals.base_color.rgb * (hemi + point);
    return vec4<f32>(lit, globals.base_color.a);
}
"#;

fn sub(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn dot(a: [f32; 3], b: [f32; 3]) -> f32 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn normalize(a: [f32; 3]) -> [f32; 3] {
    let l = dot(a, a).sqrt();
    if l > 1e-12 {
        [a[0] / l, a[1] / l, a[2] / l]
    } else {
        [0.0; 3]
    }
}

/// Local-space dot vertex after extrusion, as computed by `vs_main`.
pub fn dot_vertex_position(local: [f32; 3], max_extrusion: f32, time: f32, offset: f32) -> [f32; 3] {
    let wobble = if max_extrusion > 1.0 {
        (time + offset).sin() * WOBBLE_AMPLITUDE
    } else {
        0.0
    };
    local.map(|c| c * max_extrusion + wobble)
}

/// Cubic fresnel term for a surface normal and the direction to the eye.
pub fn fresnel(normal: [f32; 3], to_eye: [f32; 3]) -> f32 {
    let n = normalize(normal);
    let v = normalize(to_eye);
    (1.0 - dot(n, v).max(0.0)).powf(FRESNEL_POWER)
}

/// Dot fragment color, as computed by `fs_main`.
pub fn dot_color(time: f32, offset: f32, normal: [f32; 3], to_eye: [f32; 3]) -> [f32; 3] {
    let pct = (time + offset).sin().abs();
    let rim = fresnel(normal, to_eye) * RIM_STRENGTH;
    let mut out = [0.0; 3];
    for i in 0..3 {
        let base = DOT_COLOR_A[i] + (DOT_COLOR_B[i] - DOT_COLOR_A[i]) * pct;
        out[i] = base + RIM_COLOR[i] * rim;
    }
    out
}

/// Direction from a world point toward the eye.
pub fn to_eye(world: [f32; 3], eye: [f32; 3]) -> [f32; 3] {
    sub(eye, world)
}
