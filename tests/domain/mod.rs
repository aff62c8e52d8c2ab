mod conversation_key_test;
mod conversation_summary_test;
