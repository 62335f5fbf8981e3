/// WGSL shader for scene meshes: hemisphere plus directional lighting,
/// shadow-mapped directional light and linear distance fog.
///
/// `vs_shadow` is the depth-only entry point for the shadow pass; it only
/// touches bind group 0.
pub const SCENE_SHADER: &str = r#"
struct Uniforms {
    view_proj: mat4x4<f32>,
    light_view_proj: mat4x4<f32>,
    eye: vec4<f32>,
    // rgb, intensity
    sky_color: vec4<f32>,
    ground_color: vec4<f32>,
    light_color: vec4<f32>,
    light_dir: vec4<f32>,
    fog_color: vec4<f32>,
    // near, far
    fog_range: vec4<f32>,
    // enabled, texel size, bias
    shadow_params: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

@group(1) @binding(0)
var shadow_map: texture_depth_2d;
@group(1) @binding(1)
var shadow_sampler: sampler_comparison;

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
    // x: receives shadows
    @location(7) shadow: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_normal: vec3<f32>,
    @location(1) world_position: vec3<f32>,
    @location(2) color: vec4<f32>,
    @location(3) receive_shadow: f32,
};

fn model_matrix(c0: vec4<f32>, c1: vec4<f32>, c2: vec4<f32>, c3: vec4<f32>) -> mat4x4<f32> {
    return mat4x4<f32>(c0, c1, c2, c3);
}

@vertex
fn vs_main(vertex: VertexInput, instance: InstanceInput) -> VertexOutput {
    let model = model_matrix(instance.model_0, instance.model_1, instance.model_2, instance.model_3);
    let world_pos = model * vec4<f32>(vertex.position, 1.0);
    let world_normal = (model * vec4<f32>(vertex.normal, 0.0)).xyz;

    var out: VertexOutput;
    out.clip_position = uniforms.view_proj * world_pos;
    out.world_normal = normalize(world_normal);
    out.world_position = world_pos.xyz;
    out.color = instance.color;
    out.receive_shadow = instance.shadow.x;
    return out;
}

@vertex
fn vs_shadow(vertex: VertexInput, instance: InstanceInput) -> @builtin(position) vec4<f32> {
    let model = model_matrix(instance.model_0, instance.model_1, instance.model_2, instance.model_3);
    return uniforms.light_view_proj * model * vec4<f32>(vertex.position, 1.0);
}

// 1.0 is fully lit, 0.0 fully shadowed. 3x3 percentage-closer filter.
fn shadow_visibility(world_position: vec3<f32>) -> f32 {
    if uniforms.shadow_params.x < 0.5 {
        return 1.0;
    }
    let clip = uniforms.light_view_proj * vec4<f32>(world_position, 1.0);
    let ndc = clip.xyz / clip.w;
    let uv = vec2<f32>(ndc.x * 0.5 + 0.5, ndc.y * -0.5 + 0.5);
    if uv.x < 0.0 || uv.x > 1.0 || uv.y < 0.0 || uv.y > 1.0 || ndc.z < 0.0 || ndc.z > 1.0 {
        return 1.0;
    }

    let texel = uniforms.shadow_params.y;
    let depth = ndc.z - uniforms.shadow_params.z;
    var lit = 0.0;
    for (var y: i32 = -1; y <= 1; y = y + 1) {
        for (var x: i32 = -1; x <= 1; x = x + 1) {
            let offset = vec2<f32>(f32(x), f32(y)) * texel;
            lit = lit + textureSampleCompareLevel(shadow_map, shadow_sampler, uv + offset, depth);
        }
    }
    return lit / 9.0;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let n = normalize(in.world_normal);

    let sky_mix = n.y * 0.5 + 0.5;
    let hemi = mix(uniforms.ground_color.rgb, uniforms.sky_color.rgb, sky_mix) * uniforms.sky_color.a;
    let diffuse = max(dot(n, uniforms.light_dir.xyz), 0.0);
    let visibility = mix(1.0, shadow_visibility(in.world_position), in.receive_shadow);
    let direct = uniforms.light_color.rgb * uniforms.light_color.a * diffuse * visibility;
    let lit = in.color.rgb * (hemi + direct);

    let dist = distance(in.world_position, uniforms.eye.xyz);
    let near = uniforms.fog_range.x;
    let far = uniforms.fog_range.y;
    let fog = clamp((dist - near) / max(far - near, 0.0001), 0.0, 1.0);

    return vec4<f32>(mix(lit, uniforms.fog_color.rgb, fog), in.color.a);
}
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shader_exposes_both_passes() {
        assert!(SCENE_SHADER.contains("fn vs_main("));
        assert!(SCENE_SHADER.contains("fn vs_shadow("));
        assert!(SCENE_SHADER.contains("fn fs_main("));
        assert!(SCENE_SHADER.contains("texture_depth_2d"));
        assert!(SCENE_SHADER.contains("sampler_comparison"));
    }
}
