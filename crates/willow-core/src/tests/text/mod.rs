mod formatter;
mod rules;
