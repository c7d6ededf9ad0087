mod delete_test;
mod insert_test;
mod integrity_test;
