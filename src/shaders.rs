/// Applies `projection * view * model` to each vertex and forwards its color.
pub const TRANSFORM_VERTEX_SHADER: &str = r#"
struct Transform {
    projection: mat4x4<f32>,
    view: mat4x4<f32>,
    model: mat4x4<f32>,
    elapsed: f32,
}

@group(0) @binding(0) var<uniform> transform: Transform;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) color: vec3<f32>,
}

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec3<f32>,
}

@vertex
fn vs_main(input: VertexInput) -> VertexOutput {
    var output: VertexOutput;
    output.clip_position = transform.projection * transform.view * transform.model * vec4<f32>(input.position, 1.0);
    output.color = input.color;
    return output;
}
"#;

/// Spins each vertex about Z at 30 degrees per second of `transform.elapsed`
/// before the usual `projection * view * model`.
pub const SPIN_VERTEX_SHADER: &str = r#"
struct Transform {
    projection: mat4x4<f32>,
    view: mat4x4<f32>,
    model: mat4x4<f32>,
    elapsed: f32,
}

@group(0) @binding(0) var<uniform> transform: Transform;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) color: vec3<f32>,
}

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec3<f32>,
}

@vertex
fn vs_main(input: VertexInput) -> VertexOutput {
    let angle = radians(transform.elapsed * 30.0);
    let c = cos(angle);
    let s = sin(angle);
    let spun = vec3<f32>(
        input.position.x * c - input.position.y * s,
        input.position.x * s + input.position.y * c,
        input.position.z,
    );

    var output: VertexOutput;
    output.clip_position = transform.projection * transform.view * transform.model * vec4<f32>(spun, 1.0);
    output.color = input.color;
    return output;
}
"#;

pub const COLOR_FRAGMENT_SHADER: &str = r#"
struct FragmentInput {
    @location(0) color: vec3<f32>,
}

@fragment
fn fs_main(input: FragmentInput) -> @location(0) vec4<f32> {
    return vec4<f32>(input.color, 1.0);
}
"#;
