use std::collections::HashMap;

use once_cell::sync::Lazy;

#[derive(Debug, Clone, Copy)]
pub struct FilterCatalogEntry {
    pub name: &'static str,
    pub description: &'static str,
    pub enabled: bool,
}

/// Static filter catalog. Read-only for the lifetime of the process.
pub const FILTERS: &[FilterCatalogEntry] = &[
    FilterCatalogEntry {
        name: "FunkoMe",
        description: "Creates a Funko-style version",
        enabled: true,
    },
    FilterCatalogEntry {
        name: "SnapHero",
        description: "Transform the photo into a vibrant superhero character",
        enabled: true,
    },
    FilterCatalogEntry {
        name: "MyPixar",
        description: "Pixar-style animated filter",
        enabled: true,
    },
];

const FUNKO_SUFFIX: &str = "Transform the person in this image into a FunkoMe figure. \
The character should maintain the features and expression from the original photo, \
with bright colors and a playful vibe, resembling the distinctive FunkoPop style.";

const SNAPHERO_SUFFIX: &str = "Transform the person in this image into a vibrant superhero character. \
Create a cartoon-style portrait featuring bold outlines and exaggerated features. \
The superhero should have a dynamic pose, showcasing strength and confidence. \
Incorporate bright, vibrant colors in their costume and background to enhance the heroic theme. \
Ensure the character retains the original person's gender, hairstyle, and key facial features while embodying the essence of a superhero.";

const PIXAR_SUFFIX: &str = "Create a Pixar-style character portrait of the person in this image. \
The character should have large, expressive eyes that convey emotion, and the lighting should be soft and warm, enhancing the friendly atmosphere. \
Use smooth textures for the skin and clothing to mimic the polished look of Pixar animation. \
Ensure the character retains the original person's hairstyle, gender, and distinct facial features, capturing their essence in a whimsical, cinematic style.";

const GENERIC_SUFFIX: &str =
    "Create a stylized portrait of the person in this image, with a unique artistic filter applied.";

static STYLE_SUFFIXES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("FunkoMe", FUNKO_SUFFIX),
        ("SnapHero", SNAPHERO_SUFFIX),
        ("MyPixar", PIXAR_SUFFIX),
    ])
});

/// Builds the generation prompt for a filter. Unrecognized filter names fall
/// back to the generic stylization template.
pub fn prompt_for(description: &str, filter_name: &str) -> String {
    let suffix = STYLE_SUFFIXES
        .get(filter_name)
        .copied()
        .unwrap_or(GENERIC_SUFFIX);
    format!(
        "{description} transform it into a {filter_name}-style image. \
Ensure that the transformed character retains their gender, hairstyle, clothing, \
and overall likeness, including facial features and expression.{suffix}"
    )
}
