pub mod meal_prep;
