mod cgol;
mod templates;
