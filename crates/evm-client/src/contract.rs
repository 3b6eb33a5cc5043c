//! Bonding curve contract bindings

use ethers::prelude::abigen;

abigen!(
    VertexContract,
    r#"[
        function getSpotPrice() external view returns (uint256)
        function totalSupply() external view returns (uint256)
        function getBuyPrice(uint256 amount) external view returns (uint256)
        function getSellPrice(uint256 amount) external view returns (uint256)
        function balanceOf(address account) external view returns (uint256)
        function buy(uint256 amount, uint256 maxCost) external payable
        function sell(uint256 amount, uint256 minReturn) external
    ]"#
);
