mod conversation_sequencer_test;
mod fan_out_service_test;
