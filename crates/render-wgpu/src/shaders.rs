/// Uniform block and lighting shared by every pipeline. Prepended to each
/// shader below.
pub const COMMON: &str = r#"
struct Uniforms {
    view_proj: mat4x4<f32>,
    eye: vec4<f32>,
    camera_right: vec4<f32>,
    camera_up: vec4<f32>,
    ambient: vec4<f32>,
    sun_direction: vec4<f32>,
    sun_color: vec4<f32>,
    // w holds the light range.
    point_position: vec4<f32>,
    point_color: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

fn shade(world_pos: vec3<f32>, normal_in: vec3<f32>) -> vec3<f32> {
    // Double-sided: light whichever face the camera sees.
    var normal = normalize(normal_in);
    if dot(normal, uniforms.eye.xyz - world_pos) < 0.0 {
        normal = -normal;
    }
    let sun = max(dot(normal, -uniforms.sun_direction.xyz), 0.0) * uniforms.sun_color.rgb;

    let to_point = uniforms.point_position.xyz - world_pos;
    let dist = length(to_point);
    let falloff = clamp(1.0 - dist / uniforms.point_position.w, 0.0, 1.0);
    let point = max(dot(normal, to_point / max(dist, 1e-4)), 0.0) * falloff * uniforms.point_color.rgb;

    return uniforms.ambient.rgb + sun + point;
}
"#;

/// Lit, instanced props.
pub const MESH_SHADER: &str = r#"
struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
};

struct InstanceInput {
    @location(2) model_0: vec4<f32>,
    @location(3) model_1: vec4<f32>,
    @location(4) model_2: vec4<f32>,
    @location(5) model_3: vec4<f32>,
    @location(6) color: vec4<f32>,
    @location(7) params: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_pos: vec3<f32>,
    @location(1) world_normal: vec3<f32>,
    @location(2) color: vec4<f32>,
    @location(3) emissive: f32,
};

@vertex
fn vs_main(vertex: VertexInput, instance: InstanceInput) -> VertexOutput {
    let model = mat4x4<f32>(
        instance.model_0,
        instance.model_1,
        instance.model_2,
        instance.model_3,
    );
    let world_pos = model * vec4<f32>(vertex.position, 1.0);

    var out: VertexOutput;
    out.clip_position = uniforms.view_proj * world_pos;
    out.world_pos = world_pos.xyz;
    out.world_normal = (model * vec4<f32>(vertex.normal, 0.0)).xyz;
    out.color = instance.color;
    out.emissive = instance.params.x;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let lit = in.color.rgb * shade(in.world_pos, in.world_normal);
    return vec4<f32>(lit + in.color.rgb * in.emissive, in.color.a);
}
"#;

/// Camera-facing particle quads, blended additively.
pub const PARTICLE_SHADER: &str = r#"
struct InstanceInput {
    @location(0) position_size: vec4<f32>,
    @location(1) color: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) local: vec2<f32>,
    @location(1) color: vec4<f32>,
};

@vertex
fn vs_particle(@builtin(vertex_index) index: u32, instance: InstanceInput) -> VertexOutput {
    var corners = array<vec2<f32>, 6>(
        vec2<f32>(-0.5, -0.5), vec2<f32>(0.5, -0.5), vec2<f32>(0.5, 0.5),
        vec2<f32>(0.5, 0.5), vec2<f32>(-0.5, 0.5), vec2<f32>(-0.5, -0.5),
    );
    let corner = corners[index];
    let size = instance.position_size.w;
    let world = instance.position_size.xyz
        + uniforms.camera_right.xyz * corner.x * size
        + uniforms.camera_up.xyz * corner.y * size;

    var out: VertexOutput;
    out.clip_position = uniforms.view_proj * vec4<f32>(world, 1.0);
    out.local = corner * 2.0;
    out.color = instance.color;
    return out;
}

@fragment
fn fs_particle(in: VertexOutput) -> @location(0) vec4<f32> {
    let d = length(in.local);
    let alpha = in.color.a * (1.0 - smoothstep(0.5, 1.0, d));
    return vec4<f32>(in.color.rgb, alpha);
}
"#;

/// Textured quads: character sprites and the beach.
///
/// UVs use a bottom-left origin while texture rows start at the top, so V
/// is flipped when sampling.
pub const QUAD_SHADER: &str = r#"
@group(1) @binding(0)
var quad_texture: texture_2d<f32>;
@group(1) @binding(1)
var quad_sampler: sampler;

struct InstanceInput {
    @location(0) model_0: vec4<f32>,
    @location(1) model_1: vec4<f32>,
    @location(2) model_2: vec4<f32>,
    @location(3) model_3: vec4<f32>,
    @location(4) uv_rect: vec4<f32>,
    @location(5) tint: vec4<f32>,
    @location(6) params: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
    @location(1) world_pos: vec3<f32>,
    @location(2) world_normal: vec3<f32>,
    @location(3) tint: vec4<f32>,
    @location(4) lit: f32,
};

@vertex
fn vs_quad(@builtin(vertex_index) index: u32, instance: InstanceInput) -> VertexOutput {
    var corners = array<vec2<f32>, 6>(
        vec2<f32>(0.0, 0.0), vec2<f32>(1.0, 0.0), vec2<f32>(1.0, 1.0),
        vec2<f32>(1.0, 1.0), vec2<f32>(0.0, 1.0), vec2<f32>(0.0, 0.0),
    );
    let t = corners[index];
    let model = mat4x4<f32>(
        instance.model_0,
        instance.model_1,
        instance.model_2,
        instance.model_3,
    );
    let world = model * vec4<f32>(t - vec2<f32>(0.5, 0.5), 0.0, 1.0);

    var out: VertexOutput;
    out.clip_position = uniforms.view_proj * world;
    out.uv = mix(instance.uv_rect.xy, instance.uv_rect.zw, t);
    out.world_pos = world.xyz;
    out.world_normal = (model * vec4<f32>(0.0, 0.0, 1.0, 0.0)).xyz;
    out.tint = instance.tint;
    out.lit = instance.params.x;
    return out;
}

@fragment
fn fs_quad(in: VertexOutput) -> @location(0) vec4<f32> {
    let texel = textureSample(quad_texture, quad_sampler, vec2<f32>(in.uv.x, 1.0 - in.uv.y));
    let color = texel * in.tint;
    if color.a < 0.1 {
        discard;
    }
    let light = mix(vec3<f32>(1.0), shade(in.world_pos, in.world_normal), in.lit);
    return vec4<f32>(color.rgb * light, color.a);
}
"#;
