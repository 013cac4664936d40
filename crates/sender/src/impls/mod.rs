mod relay;

mod rpc_client;
