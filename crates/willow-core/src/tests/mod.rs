mod audio;
mod text;
