use std::fmt;
use std::sync::Arc;

use crate::transcode::core::recipes::Recipe;
use crate::transcode::image::Format;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CropSupport {
    #[default]
    None,
    Exact,
    Approximate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResizeSupport {
    #[default]
    None,
    Exact,
    ExactOrSmaller,
    ExactOrLarger,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RotateSupport {
    #[default]
    None,
    MultipleOf90,
    MultipleOf90Flip,
    MultipleOf180,
}

pub type RecipeFactory = Arc<dyn Fn() -> Box<dyn Recipe> + Send + Sync>;

/// A named transformation strategy and the requests it can serve.
///
/// Empty format lists accept any format.
#[derive(Clone)]
pub struct Rule {
    pub name: String,
    pub allowed_input_formats: Vec<Format>,
    pub allowed_output_formats: Vec<Format>,
    pub requires_equal_input_output_format: bool,
    pub is_passthrough: bool,
    pub crop_support: CropSupport,
    pub resize_support: ResizeSupport,
    pub rotate_support: RotateSupport,
    recipe_factory: RecipeFactory,
}

impl Rule {
    /// A rule supporting nothing beyond a plain format change.
    pub fn new<F>(name: impl Into<String>, recipe_factory: F) -> Self
    where
        F: Fn() -> Box<dyn Recipe> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            allowed_input_formats: Vec::new(),
            allowed_output_formats: Vec::new(),
            requires_equal_input_output_format: false,
            is_passthrough: false,
            crop_support: CropSupport::None,
            resize_support: ResizeSupport::None,
            rotate_support: RotateSupport::None,
            recipe_factory: Arc::new(recipe_factory),
        }
    }

    pub fn with_input_formats(mut self, formats: Vec<Format>) -> Self {
        self.allowed_input_formats = formats;
        self
    }

    pub fn with_output_formats(mut self, formats: Vec<Format>) -> Self {
        self.allowed_output_formats = formats;
        self
    }

    pub fn requiring_equal_formats(mut self) -> Self {
        self.requires_equal_input_output_format = true;
        self
    }

    pub fn passthrough(mut self) -> Self {
        self.is_passthrough = true;
        self
    }

    pub fn with_crop_support(mut self, support: CropSupport) -> Self {
        self.crop_support = support;
        self
    }

    pub fn with_resize_support(mut self, support: ResizeSupport) -> Self {
        self.resize_support = support;
        self
    }

    pub fn with_rotate_support(mut self, support: RotateSupport) -> Self {
        self.rotate_support = support;
        self
    }

    pub fn make_recipe(&self) -> Box<dyn Recipe> {
        (self.recipe_factory)()
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("allowed_input_formats", &self.allowed_input_formats)
            .field("allowed_output_formats", &self.allowed_output_formats)
            .field(
                "requires_equal_input_output_format",
                &self.requires_equal_input_output_format,
            )
            .field("is_passthrough", &self.is_passthrough)
            .field("crop_support", &self.crop_support)
            .field("resize_support", &self.resize_support)
            .field("rotate_support", &self.rotate_support)
            .finish()
    }
}
