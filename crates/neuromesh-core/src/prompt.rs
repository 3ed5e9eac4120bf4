//! Fixed instruction sent alongside the image.

/// Asks the model to decompose the concept art into a primitive block-out,
/// infer PBR materials, and write a `bpy` script that rebuilds it.
pub const BLOCKOUT_INSTRUCTION: &str = r#"You are an expert Technical Artist for AAA games.

1. Analyze the input image (character concept art).
2. Deconstruct the character into a set of 3D primitive shapes (block-out phase).
3. Define the physical materials (PBR values: roughness and metallic between 0 and 1, base colour as #RRGGBB).
4. Write a Python script for Blender (using the 'bpy' module) that:
   - Clears the scene.
   - Creates these primitive shapes (Cubes, Spheres, Cylinders, Cones) positioned roughly
     to form the character's silhouette.
   - Creates basic materials with the colors from the image and applies them.
   - Names the objects after the body part they represent (Head, Torso, Arm_L, etc.).
   - Sets the scene up for export.

Every part must reference one of the materials by name.
RETURN JSON ONLY. The response must follow the schema defined."#;
