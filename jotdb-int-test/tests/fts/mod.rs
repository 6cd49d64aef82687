mod fts_index_test;
