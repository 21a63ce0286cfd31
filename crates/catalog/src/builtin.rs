//! Fragment shaders applied to the camera feed out of the box.
//!
//! All of them sample the camera texture through `sampler` at `texUv`, the
//! inputs the host's texture renderer provides.

pub const CAMERA_FEED: &str = r#"precision mediump float;
varying vec2 texUv;
uniform sampler2D sampler;
void main() { gl_FragColor = texture2D(sampler, texUv); }
"#;

pub const COLOR_BOOST: &str = r#"precision mediump float;
varying vec2 texUv;
uniform sampler2D sampler;
void main() {
  vec4 c = texture2D(sampler, texUv);
  float y = dot(c.rgb, vec3(0.299, 0.587, 0.114));
  float u = dot(c.rgb, vec3(-.159, -.331, .5)) * 6.0;
  float v = dot(c.rgb, vec3(.5, -.419, -.081)) * 3.0;
  gl_FragColor = vec4(y + 1.4 * v, y - .343 * u - .711 * v, y + 1.765 * u, c.a);
}
"#;

pub const VIGNETTE: &str = r#"precision mediump float;
varying vec2 texUv;
uniform sampler2D sampler;
void main() {
  float x = texUv.x - .5;
  float y = texUv.y - .5;
  float v = 1.5 - sqrt(x * x + y * y) * 2.5;
  vec4 c = texture2D(sampler, texUv);
  gl_FragColor = vec4(c.rgb * (v > 1.0 ? 1.0 : v), c.a);
}
"#;

pub const BLACK_AND_WHITE: &str = r#"precision mediump float;
varying vec2 texUv;
uniform sampler2D sampler;
void main() {
  vec4 c = texture2D(sampler, texUv);
  gl_FragColor = vec4(vec3(dot(c.rgb, vec3(0.299, 0.587, 0.114))), c.a);
}
"#;

pub const SEPIA: &str = r#"precision mediump float;
varying vec2 texUv;
uniform sampler2D sampler;
void main() {
  vec4 c = texture2D(sampler, texUv);
  gl_FragColor.r = dot(c.rgb, vec3(.393, .769, .189));
  gl_FragColor.g = dot(c.rgb, vec3(.349, .686, .168));
  gl_FragColor.b = dot(c.rgb, vec3(.272, .534, .131));
  gl_FragColor.a = c.a;
}
"#;

pub const PURPLE: &str = r#"precision mediump float;
varying vec2 texUv;
uniform sampler2D sampler;
void main() {
  vec4 c = texture2D(sampler, texUv);
  float y = dot(c.rgb, vec3(0.299, 0.587, 0.114));
  vec3 p = vec3(.463, .067, .712);
  vec3 rgb = y < .25 ? (y * 4.0) * p : ((y - .25) * 1.333) * (vec3(1.0, 1.0, 1.0) - p) + p;
  gl_FragColor = vec4(rgb, c.a);
}
"#;

/// Built-in shaders in cycling order.
pub const BUILTIN: [(&str, &str); 6] = [
    ("camera-feed", CAMERA_FEED),
    ("color-boost", COLOR_BOOST),
    ("vignette", VIGNETTE),
    ("black-and-white", BLACK_AND_WHITE),
    ("sepia", SEPIA),
    ("purple", PURPLE),
];
