
mod property_form;
