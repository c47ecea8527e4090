// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Static HTML page around an inlined X3D scene
//!
//! Shapes are addressed only through the `id` each fragment carries. A click
//! calls `select(shape)`, which paints the shape's material in the highlight
//! color and restores the previously selected one; `t` toggles the
//! visibility of the current selection.

use crate::RendererConfig;

/// Diffuse color given to the selected shape
pub const HIGHLIGHT_COLOR: &str = "1, 0.65, 0";

/// Element id of the `<x3d>` canvas
pub const SCENE_ELEMENT_ID: &str = "cadscene-x3d-scene";

const HEADER: &str = r#"
<head>
    <title>cadscene @VERSION@ x3dom renderer</title>
    <meta name='Keywords' content='WebGl,cadscene'>
    <meta charset="utf-8">
    <link rel="stylesheet" type="text/css" href="https://x3dom.org/release/x3dom.css">
    <script src="https://x3dom.org/release/x3dom.js"></script>
    <style>
        body {
            background: linear-gradient(@BG_TOP@, @BG_BOTTOM@);
            margin: 0px;
            overflow: hidden;
        }
        #banner, #commands {
            padding: 5px;
            position: absolute;
            border-radius: 5px;
            border: 2px solid #f7941e;
            font-family: Arial;
            background-color: #414042;
            color: #ffffff;
            font-size: 14px;
            opacity: 0.5;
        }
        #banner {
            left: 1%;
            bottom: 2%;
            width: 280px;
        }
        #commands {
            right: 1%;
            top: 2%;
            width: 180px;
        }
        a {
            color: #f7941e;
            text-decoration: none;
        }
        a:hover {
            color: #ffffff;
        }
    </style>
</head>
"#;

const BODY: &str = r#"
<body>
    @X3DSCENE@
    <div id="banner">
        cadscene-@VERSION@ <a href="https://www.x3dom.org" target="_blank">x3dom</a> renderer
    </div>
    <div id="commands">
    <b>t</b> view/hide shape<br>
    <b>r</b> reset view<br>
    <b>a</b> show all<br>
    <b>u</b> upright<br>
    </div>
    <script>
    var previous_color = null;
    var selected_shape = null;
    var selected_material = null;
    function fitCamera()
    {
        document.getElementById('@SCENE_ID@').runtime.fitAll();
    }
    function select(shape)
    {
        if (selected_material) {
            selected_material.diffuseColor = previous_color;
        }
        selected_shape = shape;
        var appearance = shape.getElementsByTagName("Appearance")[0];
        var material = appearance.getElementsByTagName("Material")[0];
        selected_material = material;
        if (material) {
            previous_color = material.diffuseColor;
            material.diffuseColor = "@HIGHLIGHT@";
        }
    }
    function onDocumentKeyPress(event) {
        event.preventDefault();
        if (event.key == "t" && selected_shape) {
            selected_shape.render = (selected_shape.render == "true") ? "false" : "true";
        }
    }
    document.addEventListener('keypress', onDocumentKeyPress, false);
    </script>
</body>
"#;

const AXES_PLANE: &str = r#"
        <transform scale="@ZOOM@,@ZOOM@,@ZOOM@">
        <transform id="plane_small_axes" rotation="1 0 0 -1.57079632679">
            <inline url="https://rawcdn.githack.com/x3dom/component-editor/master/static/x3d/plane.x3d" mapDEFToID="true" namespaceName="plane"></inline>
            <inline url="https://rawcdn.githack.com/x3dom/component-editor/master/static/x3d/axesSmall.x3d" mapDEFToID="true" namespaceName="axesSmall"></inline>
        </transform>
        <inline url="https://rawcdn.githack.com/x3dom/component-editor/master/static/x3d/axes.x3d" mapDEFToID="true" namespaceName="axes"></inline>
        </transform>
"#;

/// `<x3d>` element inlining the scene file, Z up
fn scene_element(config: &RendererConfig, scene_file: &str) -> String {
    let mut out = format!(
        "\n\t<x3d id=\"{}\" style=\"width:100%;border: none\" >\n\t\t<Scene>\n",
        SCENE_ELEMENT_ID
    );
    if config.display_axes_plane {
        let zoom = format!("{}", config.axes_plane_zoom_factor);
        out.push_str(&AXES_PLANE.replace("@ZOOM@", &zoom));
    }
    out.push_str("<transform id=\"global_scene_rotation\" rotation=\"1 0 0 -1.57079632679\">\n");
    out.push_str(&format!(
        "\t\t\t<Inline onload=\"fitCamera()\" mapDEFToID=\"true\" url=\"{}\"></Inline>\n",
        scene_file
    ));
    out.push_str("</transform>\n\t\t</Scene>\n\t</x3d>\n");
    out
}

/// Complete `index.html` for a scene file in the same directory
pub fn render_page(config: &RendererConfig, version: &str, scene_file: &str) -> String {
    let header = HEADER
        .replace("@BG_TOP@", &config.background_top)
        .replace("@BG_BOTTOM@", &config.background_bottom)
        .replace("@VERSION@", version);
    let body = BODY
        .replace("@VERSION@", version)
        .replace("@SCENE_ID@", SCENE_ELEMENT_ID)
        .replace("@HIGHLIGHT@", HIGHLIGHT_COLOR)
        .replace("@X3DSCENE@", &scene_element(config, scene_file));

    let mut page = String::from("<!DOCTYPE HTML>\n<html lang=\"en\">");
    page.push_str(&header);
    page.push_str(&body);
    page.push_str("</html>\n");
    page
}
